use clap::Parser;
use clap::error::ErrorKind;

use crate::args::LoadArgs;
use crate::error::{AppError, AppResult};
use crate::{logger, runner};

/// Parse arguments, set up logging, and drive the run to completion.
///
/// # Errors
///
/// Returns CLI parse errors and fatal client faults; configuration
/// validation failures print usage guidance and exit with status 1.
pub fn run() -> AppResult<()> {
    let args = match LoadArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            drop(err.print());
            return Ok(());
        }
        Err(err) => {
            drop(err.print());
            std::process::exit(1);
        }
    };

    logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(runner::run(&args)) {
        Err(AppError::Config(err)) => {
            eprintln!("{}", err);
            eprintln!("Run 'gust --help' for usage.");
            std::process::exit(1);
        }
        result => result,
    }
}
