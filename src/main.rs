#![warn(missing_debug_implementations, rust_2018_idioms)]

//! Splits informatically concatenated reads found in a directory of FASTQ files.
mod cli;

use log::error;
use structopt::StructOpt;

fn main() {
    let opt = cli::ReadFillet::from_args();
    opt.set_logging();

    match read_fillet::run(&opt.into_run_config()) {
        Ok(outcomes) => println!(
            "Split {} reads, kept {} reads",
            outcomes.edited.len(),
            outcomes.unedited.len()
        ),
        Err(e) => {
            let mut message = e.to_string();
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                message.push_str(&format!(": {}", cause));
                source = cause.source();
            }
            error!("{}", message);
            std::process::exit(1)
        }
    }
}
