//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{AppConfig, ConfigError};

/// psico-server - clinical records API for a psychopedagogy practice
#[derive(Parser, Debug)]
#[command(name = "psico-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when missing)
    #[arg(short, long, default_value = "psico.toml", env = "PSICO_CONFIG")]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PSICO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Load and validate the configuration, then exit
    ValidateConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind, e.g. 127.0.0.1:3001 (overrides server.bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// SQLite database file (overrides database.path)
    #[arg(long)]
    pub database: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::parse_from(["psico-server"]);
        assert_eq!(cli.config, PathBuf::from("psico.toml"));
        assert!(matches!(cli.command(), Commands::Serve(_)));
    }

    #[test]
    fn parses_global_flags() {
        let cli = Cli::parse_from([
            "psico-server",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "validate-config",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command(), Commands::ValidateConfig));
    }

    #[test]
    fn serve_overrides_apply() {
        let cli = Cli::parse_from([
            "psico-server",
            "serve",
            "--bind",
            "127.0.0.1:4000",
            "--database",
            "/tmp/clinica.sqlite",
        ]);
        let Commands::Serve(args) = cli.command() else {
            panic!("expected serve");
        };

        let mut config = AppConfig::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:4000");
        assert_eq!(config.database.path, PathBuf::from("/tmp/clinica.sqlite"));
    }

    #[test]
    fn serve_rejects_bad_bind() {
        let args = ServeArgs {
            bind: Some("not-an-address".into()),
            database: None,
        };
        assert!(args.apply(&mut AppConfig::default()).is_err());
    }
}
