//! `parley config`: check or print the resolved configuration.

use pl_domain::config::{Config, ConfigError, ConfigSeverity};

const REDACTED: &str = "[REDACTED]";

/// Print every issue `Config::validate` finds, errors first.
///
/// Returns `false` when at least one error was found; warnings alone
/// (no persona, no auth source) still let a session start.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let (errors, warnings): (Vec<ConfigError>, Vec<ConfigError>) = config
        .validate()
        .into_iter()
        .partition(|issue| issue.severity == ConfigSeverity::Error);

    if errors.is_empty() && warnings.is_empty() {
        println!("{config_path}: ok");
        return true;
    }

    for issue in errors.iter().chain(&warnings) {
        println!("{issue}");
    }
    println!(
        "\n{config_path}: {} error(s), {} warning(s)",
        errors.len(),
        warnings.len()
    );

    errors.is_empty()
}

/// Dump the resolved config (defaults filled in) as TOML, with any
/// plaintext API key masked.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &Config) -> anyhow::Result<String> {
    toml::to_string_pretty(&redacted(config))
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))
}

fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if config.provider.auth.key.is_some() {
        config.provider.auth.key = Some(REDACTED.into());
    }
    config
}
