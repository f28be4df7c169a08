//! agora: command-line presence client.
//!
//! Follows other users' presence over the live feed and reports the local
//! user's own state, using the settings in `config.toml`.

mod cli;
mod commands;

use tracing_subscriber::EnvFilter;

/// Bare levels (`debug`) apply to the agora crates; anything else is
/// taken as a full filter directive.
fn log_directive(arg: Option<&str>, configured: &str) -> String {
    match arg {
        Some(level) if !level.contains('=') => format!("agora={level}"),
        Some(directive) => directive.to_string(),
        None => configured.to_string(),
    }
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let loaded = agora_config::load_config();
    let configured = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("agora=info");

    let directive = log_directive(args.log_level.as_deref(), configured);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "agora=info".parse().unwrap()),
            ),
        )
        .init();

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        agora_config::AgoraConfig::default()
    });

    if let Err(e) = commands::run(args.command, config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
