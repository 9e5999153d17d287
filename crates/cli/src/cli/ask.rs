//! `parley ask`: one-shot submission.
//!
//! Sends a single message, prints the reply to stdout and exits. Useful
//! for scripting and piping.

use pl_domain::config::Config;
use pl_session::SessionClient;

/// Submit `message` once and print the outcome.
///
/// In JSON mode the whole transcript (greeting included) is written to
/// stdout. A failed submission exits with code 1 after printing
/// `error: {message}` to stderr.
pub async fn ask(config: &Config, message: String, json_output: bool) -> anyhow::Result<()> {
    let client = SessionClient::from_config(config)?;

    let answer = match client.submit(&message).await {
        Ok(turn) => turn,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if json_output {
        let json = serde_json::to_string_pretty(&client.transcript())
            .map_err(|e| anyhow::anyhow!("serializing transcript: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", answer.text);
    }

    Ok(())
}
