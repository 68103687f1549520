//! Initialisation du système de logs basé sur `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialise le subscriber `tracing` global.
///
/// Le niveau par défaut est `info`, ou `debug` si `debug` est vrai;
/// la variable d'environnement `RUST_LOG` reste prioritaire.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
