use std::{path::PathBuf, process::ExitCode};

use chunkswap::{Config, ProcessorKind, DEFAULT_INPUT, DEFAULT_OUTPUT};
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "chunkswap")]
#[clap(about = "Rewrite a file chunk by chunk with a byte-level processor", long_about = None)]
struct Cli {
    #[clap(short, long, default_value = DEFAULT_INPUT, help = "Input file name")]
    input: PathBuf,

    #[clap(short, long, default_value = DEFAULT_OUTPUT, help = "Output file name")]
    output: PathBuf,

    #[clap(
        short,
        long,
        default_value = "case",
        help = "Processor type: 'case' or 'log'"
    )]
    processor: String,
}

impl Cli {
    fn into_config(self) -> chunkswap::Result<Config> {
        Ok(Config {
            input: self.input,
            output: self.output,
            processor: self.processor.parse::<ProcessorKind>()?,
        })
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = Cli::parse()
        .into_config()
        .and_then(|config| chunkswap::run(&config));
    match result {
        Ok(_) => {
            println!("File processing completed successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("run failed: {:?}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
