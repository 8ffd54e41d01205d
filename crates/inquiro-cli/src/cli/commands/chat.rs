//! Interactive chat command.

use anyhow::Result;
use inquiro_core::config::Config;
use inquiro_core::logging;

pub async fn run(config: &Config) -> Result<()> {
    // held until the session ends so buffered lines reach the file
    let _log_guard = logging::init_file_logging(config)?;
    let transport = super::transport(config)?;
    inquiro_tui::run_interactive_chat(config, transport).await
}
