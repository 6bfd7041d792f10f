use std::path::PathBuf;

use clap::Parser;

use crate::io::config_io;

#[derive(Parser, Debug)]
#[command(name = "wb", about = concat!("workboard v", env!("CARGO_PKG_VERSION"), " - Azure DevOps boards in your terminal"), version)]
pub struct Cli {
    /// Directory for settings, credentials and the log file
    #[arg(short = 'C', long = "config-dir")]
    pub config_dir: Option<PathBuf>,
}

impl Cli {
    /// The config directory to use: the flag when given, else the platform default.
    pub fn resolved_config_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(config_io::config_dir)
    }
}
