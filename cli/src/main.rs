mod commands;
mod stream;
mod terminal;

use std::process::ExitCode;
use std::time::Instant;

use cdnstrip_common::error;
use commands::{CommandLine, strip};
use terminal::{logging, print, spinner};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    spinner::init(!commands.quiet);
    logging::init_logging(commands.verbose, commands.quiet);
    print::banner(commands.quiet);

    let cfg = commands.to_config();
    let start_time = Instant::now();

    match strip::strip(&commands, cfg).await {
        Ok(counters) => {
            spinner::finish();
            print::summary(counters, start_time.elapsed(), commands.quiet);
            ExitCode::SUCCESS
        }
        Err(fatal) => {
            spinner::finish();
            error!("{fatal}");
            ExitCode::FAILURE
        }
    }
}
