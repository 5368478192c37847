// Startup configuration: environment variables (optionally from `.env`) and
// the three-line credential file used to open the database connection.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

use crate::error::ConfigError;

/// File name looked up when `LINKCAR_CREDENTIALS` is not set.
pub const CREDENTIALS_FILE: &str = "credenciais.txt";

/// Postal service used when `VIACEP_URL` is not set.
pub const DEFAULT_POSTAL_URL: &str = "https://viacep.com.br";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials_path: PathBuf,
    pub postal_base_url: String,
}

impl Config {
    /// Read settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let credentials_path = std::env::var("LINKCAR_CREDENTIALS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_credentials_path());
        let postal_base_url =
            std::env::var("VIACEP_URL").unwrap_or_else(|_| DEFAULT_POSTAL_URL.into());

        Config {
            credentials_path,
            postal_base_url,
        }
    }
}

/// `credenciais.txt` in the working directory, or the copy under the user's
/// config directory when only that one exists.
fn default_credentials_path() -> PathBuf {
    let local = PathBuf::from(CREDENTIALS_FILE);
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join("linkcar").join(CREDENTIALS_FILE))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// Database login read from the credential file.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// `host[:port][/database]` or a full `postgres://` URL.
    pub descriptor: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl Credentials {
    /// Read and parse the credential file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::MissingFile(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text)
    }

    /// Exactly three trimmed lines: username, password, descriptor.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        match lines.as_slice() {
            [username, password, descriptor] => Ok(Credentials {
                username: username.to_string(),
                password: password.to_string(),
                descriptor: descriptor.to_string(),
            }),
            _ => Err(ConfigError::LineCount { found: lines.len() }),
        }
    }

    /// Driver options for these credentials. The username and password from
    /// the file override anything embedded in a URL descriptor.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let options = if is_url(&self.descriptor) {
            PgConnectOptions::from_str(&self.descriptor)
                .map_err(|e| ConfigError::InvalidDescriptor(e.to_string()))?
        } else {
            let target = ConnectTarget::parse(&self.descriptor)?;
            let mut options = PgConnectOptions::new().host(&target.host);
            if let Some(port) = target.port {
                options = options.port(port);
            }
            if let Some(database) = &target.database {
                options = options.database(database);
            }
            options
        };
        Ok(options.username(&self.username).password(&self.password))
    }
}

fn is_url(descriptor: &str) -> bool {
    descriptor.starts_with("postgres://") || descriptor.starts_with("postgresql://")
}

/// The pieces of a `host[:port][/database]` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: Option<u16>,
    pub database: Option<String>,
}

impl ConnectTarget {
    pub fn parse(descriptor: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDescriptor(descriptor.to_string());

        let (address, database) = match descriptor.split_once('/') {
            Some((address, database)) => (address, Some(database)),
            None => (descriptor, None),
        };
        let (host, port) = match address.rsplit_once(':') {
            Some((host, port)) => (host, Some(port.parse::<u16>().map_err(|_| invalid())?)),
            None => (address, None),
        };
        if host.is_empty() {
            return Err(invalid());
        }

        Ok(ConnectTarget {
            host: host.to_string(),
            port,
            database: database.filter(|db| !db.is_empty()).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_three_line_file() {
        let creds = Credentials::parse("alice\npw123\ndbhost:1521/svc\n").unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "pw123");
        assert_eq!(creds.descriptor, "dbhost:1521/svc");
    }

    #[test]
    fn trims_each_line() {
        let creds = Credentials::parse("  alice \r\npw123\r\n dbhost ").unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "pw123");
        assert_eq!(creds.descriptor, "dbhost");
    }

    #[test]
    fn rejects_wrong_line_count() {
        match Credentials::parse("alice\npw123\n") {
            Err(ConfigError::LineCount { found }) => assert_eq!(found, 2),
            other => panic!("unexpected: {:?}", other),
        }
        match Credentials::parse("a\nb\nc\nd\n") {
            Err(ConfigError::LineCount { found }) => assert_eq!(found, 4),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn debug_hides_password() {
        let creds = Credentials::parse("alice\npw123\ndbhost").unwrap();
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("pw123"));
        assert!(shown.contains("alice"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alice").unwrap();
        writeln!(file, "pw123").unwrap();
        writeln!(file, "dbhost:1521/svc").unwrap();

        let creds = Credentials::load(file.path()).unwrap();
        assert_eq!(creds.descriptor, "dbhost:1521/svc");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        assert!(matches!(
            Credentials::load(&path),
            Err(ConfigError::MissingFile(_))
        ));
    }

    #[test]
    fn descriptor_with_port_and_database() {
        let target = ConnectTarget::parse("dbhost:1521/svc").unwrap();
        assert_eq!(
            target,
            ConnectTarget {
                host: "dbhost".into(),
                port: Some(1521),
                database: Some("svc".into()),
            }
        );
    }

    #[test]
    fn descriptor_host_only() {
        let target = ConnectTarget::parse("localhost").unwrap();
        assert_eq!(target.host, "localhost");
        assert_eq!(target.port, None);
        assert_eq!(target.database, None);
    }

    #[test]
    fn descriptor_rejects_bad_port_and_empty_host() {
        assert!(ConnectTarget::parse("dbhost:abc/svc").is_err());
        assert!(ConnectTarget::parse(":5432/svc").is_err());
    }

    #[test]
    fn connect_options_use_all_three_values() {
        let creds = Credentials::parse("alice\npw123\ndbhost:1521/svc").unwrap();
        let options = creds.connect_options().unwrap();
        assert_eq!(options.get_host(), "dbhost");
        assert_eq!(options.get_port(), 1521);
        assert_eq!(options.get_username(), "alice");
        assert_eq!(options.get_database(), Some("svc"));
    }

    #[test]
    fn connect_options_accept_url_descriptor() {
        let creds = Credentials {
            username: "alice".into(),
            password: "pw123".into(),
            descriptor: "postgres://ignored@dbhost:5432/linkcar".into(),
        };
        assert!(creds.connect_options().is_ok());
    }
}
