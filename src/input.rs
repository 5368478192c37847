// Input helpers shared by the menus and handlers.

use anyhow::Result;

use crate::console::Console;

/// A chassis number (VIN) is exactly this many characters.
pub const CHASSIS_LEN: usize = 17;

/// Ask for a number until one is typed. There is no attempt limit: a wrong
/// answer only prints a hint and asks again.
pub fn read_choice<C: Console>(console: &mut C, prompt: &str) -> Result<i64> {
    loop {
        let answer = console.read_line(prompt)?;
        match answer.trim().parse::<i64>() {
            Ok(n) => return Ok(n),
            Err(_) => {
                console.alert("Por favor, apenas utilize números!");
                pause(console, "Pressione Enter para tentar novamente...")?;
            }
        }
    }
}

/// Wait for Enter so the user can read what was printed.
pub fn pause<C: Console>(console: &mut C, prompt: &str) -> Result<()> {
    console.read_line(prompt)?;
    Ok(())
}

pub fn is_valid_chassis(chassis: &str) -> bool {
    chassis.chars().count() == CHASSIS_LEN
}

/// Render an optional column for listings.
pub fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}
