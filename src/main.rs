use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use csvfilter::{Config, ErrorKind, Logger, Processor};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "csvfilter", version, about = "Process CSV data based on a given configuration")]
struct Cli {
    /// Path to the configuration file
    #[arg(
        long = "config-path",
        alias = "config_path",
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config_path: PathBuf,
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Config => 2,
        ErrorKind::Parse => 3,
        ErrorKind::DataRead => 4,
        ErrorKind::DataWrite => 5,
    }
}

fn run(cli: &Cli) -> csvfilter::Result<()> {
    let config = Config::load(&cli.config_path)?.into_valid()?;
    let log = Logger::stderr(config.debug);

    let processor = Processor::new(&config, &log);
    let filtered = processor.run()?;

    log.scope(|| {
        info!("\n{}", filtered);
        info!("Data processing complete.");
    });

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("csvfilter: {}", e);
            ExitCode::from(exit_code(e.kind()))
        }
    }
}
