//! `dapd` — read-only directory access protocol daemon.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dapd_auth::hardware_token::HardwareTokenVerifier;
use dapd_server::AppState;
use tracing_subscriber::EnvFilter;

/// Read-only directory service speaking a simple-bind/search subset of the
/// directory access protocol against a statically configured user/group
/// database.
#[derive(Debug, Parser)]
#[command(name = "dapd", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short = 'c', long, default_value = "dapd.yaml")]
    config: PathBuf,

    /// Load and validate the configuration, then exit without serving.
    #[arg(long)]
    check_config: bool,

    /// Force debug-level logging regardless of the configured log level.
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match dapd_config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fatal: loading {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.log_level, cli.debug);

    if cli.check_config {
        tracing::info!(path = %cli.config.display(), "configuration is valid");
        return ExitCode::SUCCESS;
    }

    let hardware_verifier = match config.hardware_token.clone() {
        Some(hw_config) => match HardwareTokenVerifier::new(hw_config) {
            Ok(verifier) => Some(verifier),
            Err(e) => {
                tracing::error!(error = %e, "fatal: invalid hardware-token configuration");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let store = config.entity_store();
    let state = Arc::new(AppState {
        store,
        hardware_verifier,
        stats: dapd_server::Stats::new(),
        enforce_tls: config.ldaps.enforce_tls,
    });

    tracing::info!(
        server_name = %config.server_name,
        base_dn = %config.base_dn,
        ldap_enabled = config.ldap.enabled,
        ldaps_enabled = config.ldaps.enabled,
        "dapd starting"
    );

    if let Err(e) = dapd_server::run(&config.ldap, &config.ldaps, state).await {
        tracing::error!(error = %e, "fatal: protocol front-end exited");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging(configured_level: &str, debug_override: bool) {
    let level = if debug_override { "debug" } else { configured_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
