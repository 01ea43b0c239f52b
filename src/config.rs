//! Connection configuration.

use clap::Args;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DBNAME: &str = "mans360_dev";
pub const DEFAULT_USER: &str = "mans360admin";
pub const DEFAULT_PASSWORD: &str = "changeme";

/// PostgreSQL connection options.
///
/// Built once at startup and passed by reference. Flags override the
/// `MANS360_DB_*` environment variables, which override the defaults.
#[derive(Args, Clone, PartialEq, Eq)]
pub struct DbOpts {
    /// Database host
    #[arg(long = "db-host", env = "MANS360_DB_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Database port
    #[arg(long = "db-port", env = "MANS360_DB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Database name
    #[arg(long = "db-name", env = "MANS360_DB_NAME", default_value = DEFAULT_DBNAME)]
    pub dbname: String,

    /// Database user
    #[arg(long = "db-user", env = "MANS360_DB_USER", default_value = DEFAULT_USER)]
    pub user: String,

    /// Database password
    #[arg(
        long = "db-password",
        env = "MANS360_DB_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,
}

impl Default for DbOpts {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dbname: DEFAULT_DBNAME.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl DbOpts {
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password)
            .application_name("seed-loader");
        config
    }

    /// `user@host:port/dbname`, for logs and error messages.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }
}

impl fmt::Debug for DbOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbOpts")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whether a `.env` file contributed to the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Absent,
    Unreadable(String),
}

impl EnvFile {
    /// Look for a `.env` file once, at startup, before arguments are parsed.
    pub fn load() -> Self {
        match dotenv::dotenv() {
            Ok(path) => EnvFile::Loaded(path),
            Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                EnvFile::Absent
            }
            Err(e) => EnvFile::Unreadable(e.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => tracing::info!("Loaded environment from {}", path.display()),
            EnvFile::Absent => tracing::debug!("No .env file found, using process environment"),
            EnvFile::Unreadable(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        db: DbOpts,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--db-host",
            "db.example.internal",
            "--db-port",
            "6543",
            "--db-name",
            "mans360_test",
        ]);
        assert_eq!(cli.db.host, "db.example.internal");
        assert_eq!(cli.db.port, 6543);
        assert_eq!(cli.db.dbname, "mans360_test");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(TestCli::try_parse_from(["test", "--db-port", "not-a-port"]).is_err());
    }

    #[test]
    fn test_target_omits_password() {
        let opts = DbOpts {
            password: "s3cret".to_string(),
            ..Default::default()
        };
        assert_eq!(opts.target(), "mans360admin@localhost:5432/mans360_dev");
        assert!(!format!("{opts:?}").contains("s3cret"));
    }

    #[test]
    fn test_pg_config() {
        let config = DbOpts::default().to_pg_config();
        assert_eq!(config.get_user(), Some("mans360admin"));
        assert_eq!(config.get_dbname(), Some("mans360_dev"));
        assert_eq!(config.get_ports(), &[5432]);
        assert_eq!(config.get_password(), Some(&b"changeme"[..]));
    }
}
