use clap::Parser;
use workboard::cli::Cli;
use workboard::io::logging;

fn main() {
    let cli = Cli::parse();
    let config_dir = cli.resolved_config_dir();

    // Logging is best effort; the TUI still runs without a log file.
    if let Err(e) = logging::init_tracing(&config_dir) {
        eprintln!("warning: logging disabled: {}", e);
    }

    if let Err(e) = workboard::tui::run(&config_dir) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
