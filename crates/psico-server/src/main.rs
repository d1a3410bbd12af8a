use anyhow::Context;
use clap::Parser;
use psico_core::{ClinicCore, TokenIssuer};
use psico_server::api::server::{serve, shutdown_signal};
use psico_server::cli::{Cli, Commands};
use psico_server::config::{load_config, AppConfig};
use psico_server::logging::init_logging;
use psico_server::{app_router, ApiContext};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional; a missing .env is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command() {
        Commands::ValidateConfig => {
            println!(
                "Configuration OK (bind {}, database {})",
                config.server.bind,
                config.database.path.display()
            );
            Ok(())
        }
        Commands::Serve(args) => {
            args.apply(&mut config)?;
            let _guard = init_logging(&config.logging, cli.log_level.as_deref())?;
            run(config).await
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "psico-server starting");

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }

    let core = ClinicCore::open(&config.database.path, config.auth.hash_params())
        .with_context(|| format!("opening database {}", config.database.path.display()))?;
    tracing::info!(path = %config.database.path.display(), "database ready");

    if let Some(admin) = &config.auth.bootstrap_admin {
        let created = core.ensure_bootstrap_admin(&admin.usuario, admin.contrasenia.expose_secret())?;
        if created.is_none() {
            tracing::debug!("therapists present, bootstrap admin skipped");
        }
    }

    let tokens = match &config.auth.token_secret {
        Some(secret) => TokenIssuer::new(secret, config.auth.token_ttl()),
        None => {
            tracing::warn!("no auth.token_secret configured; using a random key, sessions end on restart");
            TokenIssuer::with_random_key(config.auth.token_ttl())
        }
    };
    tracing::info!(
        key_fingerprint = tokens.fingerprint(),
        ttl_hours = tokens.ttl().num_hours(),
        "token signing ready"
    );

    let router = app_router(ApiContext::new(core, tokens), &config.server.cors_origins);
    let addr = config.server.socket_addr()?;

    serve(addr, router, shutdown_signal())
        .await
        .with_context(|| format!("serving on {addr}"))?;
    Ok(())
}
