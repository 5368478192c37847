// Entrypoint for the LinkCar console.
// - Load configuration and credentials, open the database connection, then
//   hand everything to the menu loop.
// - Startup failures (credentials, connection) end the program early; all
//   other errors are handled inside the menu.

use anyhow::Context as _;
use linkcar::api::ViaCepClient;
use linkcar::config::{Config, Credentials};
use linkcar::console::Terminal;
use linkcar::error::ConfigError;
use linkcar::session::Session;
use linkcar::store::PgStore;
use linkcar::ui::{main_menu, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONNECT_FAILED: &str =
    "Não foi possível conectar ao banco de dados. O programa será encerrado.";

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Logs go to stderr and default to warnings so the menu stays readable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let credentials = match Credentials::load(&config.credentials_path) {
        Ok(credentials) => credentials,
        Err(e) => {
            if let ConfigError::LineCount { .. } = e {
                println!("O arquivo de credencial deve ter somente 3 linhas!");
            }
            tracing::error!(path = %config.credentials_path.display(), error = %e, "credentials not loaded");
            println!("{}", e);
            println!("{}", CONNECT_FAILED);
            return Ok(());
        }
    };

    let store = match credentials
        .connect_options()
        .map_err(anyhow::Error::from)
        .and_then(|options| PgStore::connect(&options).map_err(anyhow::Error::from))
    {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            println!("Erro ao conectar ao banco de dados: {}", e);
            println!("{}", CONNECT_FAILED);
            return Ok(());
        }
    };

    let postal = ViaCepClient::new(&config.postal_base_url)?;
    let mut ctx = Context::new(store, postal, Terminal::new());
    let mut session = Session::new();

    // Blocks until the user picks "Sair".
    let outcome = main_menu(&mut ctx, &mut session);

    ctx.store.close().context("Failed to close database connection")?;
    outcome
}
