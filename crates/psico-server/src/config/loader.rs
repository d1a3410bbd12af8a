//! Configuration loading: TOML file plus `PSICO_*` environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use secrecy::SecretString;

use super::{AppConfig, BootstrapAdmin, ConfigError, LogFormat};

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "PSICO_";

/// Load configuration from `path`, apply environment overrides and validate.
///
/// A missing file is not an error: defaults are used instead.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: impl AsRef<Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();

    let mut config = if path.exists() {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut config, lookup)?;
    config.validate()?;
    Ok(config)
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::Invalid(format!("{key}={value:?}: {e}")))
}

/// Apply `PSICO_<SECTION>_<KEY>` overrides read through `lookup`.
///
/// For example: `PSICO_SERVER_BIND`, `PSICO_AUTH_TOKEN_SECRET`,
/// `PSICO_AUTH_BOOTSTRAP_ADMIN_USUARIO`. `PSICO_SERVER_CORS_ORIGINS` is a
/// comma-separated list.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| {
        let key = format!("{ENV_PREFIX}{suffix}");
        lookup(&key).map(|value| (key, value))
    };

    // Server
    if let Some((_, val)) = var("SERVER_BIND") {
        config.server.bind = val;
    }
    if let Some((_, val)) = var("SERVER_CORS_ORIGINS") {
        config.server.cors_origins = val
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
    }

    // Database
    if let Some((_, val)) = var("DATABASE_PATH") {
        config.database.path = PathBuf::from(val);
    }

    // Auth
    if let Some((_, val)) = var("AUTH_TOKEN_SECRET") {
        config.auth.token_secret = Some(SecretString::new(val));
    }
    if let Some((key, val)) = var("AUTH_TOKEN_TTL_HOURS") {
        config.auth.token_ttl_hours = parse_number(&key, &val)?;
    }
    if let Some((key, val)) = var("AUTH_HASH_MEMORY_KIB") {
        config.auth.hash_memory_kib = parse_number(&key, &val)?;
    }
    if let Some((key, val)) = var("AUTH_HASH_ITERATIONS") {
        config.auth.hash_iterations = parse_number(&key, &val)?;
    }
    if let Some((key, val)) = var("AUTH_HASH_PARALLELISM") {
        config.auth.hash_parallelism = parse_number(&key, &val)?;
    }

    let admin_user = var("AUTH_BOOTSTRAP_ADMIN_USUARIO").map(|(_, v)| v);
    let admin_password = var("AUTH_BOOTSTRAP_ADMIN_CONTRASENIA").map(|(_, v)| v);
    if admin_user.is_some() || admin_password.is_some() {
        let current = config.auth.bootstrap_admin.take();
        let (current_user, current_password) = match current {
            Some(admin) => (Some(admin.usuario), Some(admin.contrasenia)),
            None => (None, None),
        };

        let usuario = admin_user.or(current_user).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "{ENV_PREFIX}AUTH_BOOTSTRAP_ADMIN_CONTRASENIA set without a bootstrap usuario"
            ))
        })?;
        let contrasenia = admin_password
            .map(SecretString::new)
            .or(current_password)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "{ENV_PREFIX}AUTH_BOOTSTRAP_ADMIN_USUARIO set without a bootstrap contrasenia"
                ))
            })?;
        config.auth.bootstrap_admin = Some(BootstrapAdmin {
            usuario,
            contrasenia,
        });
    }

    // Logging
    if let Some((_, val)) = var("LOGGING_LEVEL") {
        config.logging.level = val;
    }
    if let Some((_, val)) = var("LOGGING_FORMAT") {
        config.logging.format = LogFormat::from_str(&val)?;
    }
    if let Some((_, val)) = var("LOGGING_DIRECTORY") {
        config.logging.directory = Some(PathBuf::from(val));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_with(dir.path().join("nope.toml"), env(&[])).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:3001");
        assert_eq!(config.database.path, PathBuf::from("data/psicopedagogia.sqlite"));
    }

    #[test]
    fn file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psico.toml");
        fs::write(&path, "[database]\npath = \"clinica.sqlite\"\n").unwrap();

        let config = load_config_with(&path, env(&[])).unwrap();
        assert_eq!(config.database.path, PathBuf::from("clinica.sqlite"));
    }

    #[test]
    fn env_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psico.toml");
        fs::write(&path, "[server]\nbind = \"127.0.0.1:8080\"\n").unwrap();

        let config = load_config_with(&path, env(&[("PSICO_SERVER_BIND", "127.0.0.1:9090")])).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9090");
    }

    #[test]
    fn invalid_result_is_rejected_after_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_with(
            dir.path().join("nope.toml"),
            env(&[("PSICO_AUTH_TOKEN_SECRET", "corto")]),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psico.toml");
        fs::write(&path, "[server\nbind = ").unwrap();

        assert!(matches!(
            load_config_with(&path, env(&[])),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_every_section() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PSICO_SERVER_BIND", "127.0.0.1:9000"),
                ("PSICO_SERVER_CORS_ORIGINS", "http://a.test, http://b.test,"),
                ("PSICO_DATABASE_PATH", "/tmp/x.sqlite"),
                ("PSICO_AUTH_TOKEN_SECRET", "0123456789abcdef0123456789abcdef"),
                ("PSICO_AUTH_TOKEN_TTL_HOURS", "12"),
                ("PSICO_AUTH_HASH_ITERATIONS", "3"),
                ("PSICO_LOGGING_LEVEL", "debug"),
                ("PSICO_LOGGING_FORMAT", "JSON"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.database.path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(
            config.auth.token_secret.as_ref().unwrap().expose_secret(),
            "0123456789abcdef0123456789abcdef"
        );
        assert_eq!(config.auth.token_ttl_hours, 12);
        assert_eq!(config.auth.hash_iterations, 3);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        config.validate().unwrap();
    }

    #[test]
    fn huge_env_ttl_rejected_before_use() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_with(
            dir.path().join("nope.toml"),
            env(&[("PSICO_AUTH_TOKEN_TTL_HOURS", "9223372036854775807")]),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn env_number_must_parse() {
        let mut config = AppConfig::default();
        let result = apply_env_overrides(&mut config, env(&[("PSICO_AUTH_TOKEN_TTL_HOURS", "ocho")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn bootstrap_admin_from_env_merges_with_file() {
        let mut config: AppConfig = toml::from_str(
            "[auth.bootstrap_admin]\nusuario = \"admin\"\ncontrasenia = \"desde-archivo\"\n",
        )
        .unwrap();
        apply_env_overrides(
            &mut config,
            env(&[("PSICO_AUTH_BOOTSTRAP_ADMIN_CONTRASENIA", "desde-entorno")]),
        )
        .unwrap();

        let admin = config.auth.bootstrap_admin.unwrap();
        assert_eq!(admin.usuario, "admin");
        assert_eq!(admin.contrasenia.expose_secret(), "desde-entorno");
    }

    #[test]
    fn bootstrap_admin_needs_both_halves() {
        let mut config = AppConfig::default();
        let result = apply_env_overrides(
            &mut config,
            env(&[("PSICO_AUTH_BOOTSTRAP_ADMIN_USUARIO", "admin")]),
        );
        assert!(result.is_err());
    }
}
