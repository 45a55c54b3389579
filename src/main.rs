use clap::Parser;
use hsrp_check::{Cli, Outcome, run};
use tracing::Level;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(Outcome::Passed) => {}
        Ok(Outcome::Failed) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    }
}

// Logs go to stderr; stdout carries only the JSON report.
fn init_logging(verbose: bool) {
    let level = if verbose || std::env::var("HSRP_CHECK_DEBUG").is_ok() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
