pub mod cli;
pub mod credentials;
pub mod dispatch;
pub mod logging;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::install_panic_hook();
    let _log_guard = logging::init()?;

    dispatch::run(cli)
}
