// Error types shared across the crate.
// Each seam (configuration, database, postal lookup) has its own enum so the
// UI can decide whether to abort the program or just the current action.

use thiserror::Error;

/// Problems found while locating or reading the credential file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Arquivo de credenciais não encontrado: {0}")]
    MissingFile(String),

    #[error("Erro ao ler o arquivo de credenciais: {0}")]
    Io(#[from] std::io::Error),

    /// The file must hold exactly username, password and descriptor.
    #[error("Erro no formato do arquivo de credenciais: esperadas 3 linhas, encontradas {found}")]
    LineCount { found: usize },

    #[error("Descritor de conexão inválido: {0}")]
    InvalidDescriptor(String),
}

/// Failure of a single persistence call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// The local runtime that drives the driver could not be started.
    #[error("falha ao iniciar o runtime do banco: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Why a postal-code lookup produced no address.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("falha na requisição: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status inesperado: {0}")]
    Status(reqwest::StatusCode),

    #[error("CEP {0} não encontrado")]
    NotFound(String),
}
