use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pl_cli::cli::{Cli, Command, ConfigCommand};
use pl_domain::config::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Chat) => {
            let (config, config_path) = pl_cli::cli::load_config()?;
            init_tracing(&config.observability);
            pl_cli::cli::chat::chat(&config)
                .await
                .with_context(|| format!("starting chat with {config_path}"))
        }
        Some(Command::Ask { message, json }) => {
            let (config, _) = pl_cli::cli::load_config()?;
            init_tracing(&config.observability);
            pl_cli::cli::ask::ask(&config, message, json).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = pl_cli::cli::load_config()?;
            if !pl_cli::cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _) = pl_cli::cli::load_config()?;
            pl_cli::cli::config::show(&config)
        }
        Some(Command::Version) => {
            println!("parley {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Install the global subscriber. Output goes to stderr so stdout stays
/// clean for replies; `RUST_LOG` overrides the configured filter.
fn init_tracing(obs: &ObservabilityConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&obs.log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if obs.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
