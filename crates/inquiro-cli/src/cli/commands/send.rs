//! One-shot message command.

use anyhow::{Result, bail};
use inquiro_core::config::Config;
use inquiro_core::logging;
use inquiro_core::transport::Transport;

pub async fn run(message: &str, config: &Config) -> Result<()> {
    logging::init_stderr_logging(config);

    let message = message.trim();
    if message.is_empty() {
        bail!("Message is empty");
    }

    let transport = super::transport(config)?;
    let reply = transport
        .send_chat(message)
        .await
        .map_err(|e| super::request_failed(e, "send message"))?;
    println!("{}", reply.reply);
    Ok(())
}
