use frustration_scraper::{init_tracing_once, FrustrationScraper, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing_once();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let scraper = match FrustrationScraper::from_path(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match scraper.run() {
        Ok(summary) => {
            print!("{}", summary.render());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
