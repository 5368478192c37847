// Console abstraction. Handlers read and print through `Console` so the
// flows can be driven by a scripted console in tests; `Terminal` is the
// interactive implementation built on `dialoguer`.

use anyhow::Result;
use crossterm::style::{style, Stylize};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait Console {
    /// Prompt and read one line. Empty answers are allowed.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Like `read_line` but without echoing what is typed.
    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt)
    }

    /// Print a normal line.
    fn say(&mut self, line: &str);

    /// Print an error or warning line.
    fn alert(&mut self, line: &str) {
        self.say(line);
    }

    /// Run `work` while showing `message` as in-progress feedback.
    fn busy<T>(&mut self, _message: &str, work: impl FnOnce() -> T) -> T {
        work()
    }
}

/// The real terminal.
#[derive(Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Terminal
    }
}

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(line)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        let secret = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(secret)
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn alert(&mut self, line: &str) {
        println!("{}", style(line).red());
    }

    fn busy<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T {
        // `ProgressSpinner` keeps ticking while the blocking call runs.
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        let out = work();
        spinner.finish_and_clear();
        out
    }
}
