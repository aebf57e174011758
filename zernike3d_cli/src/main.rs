#![allow(missing_docs)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;
use zernike3d_cli::{driver, Opts, ResultStore};

fn main() -> ExitCode {
    let opts = Opts::parse();

    if let Err(e) = init_logging(&opts) {
        eprintln!("error: {e:?}");
        return ExitCode::FAILURE;
    }

    match run(&opts) {
        Ok(summary) => {
            info!(
                "{} computed, {} skipped (up to date), {} warning(s), {} discovered",
                summary.computed, summary.skipped_up_to_date, summary.warnings, summary.discovered
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> anyhow::Result<driver::Summary> {
    let output_dir = opts
        .output_dir
        .clone()
        .unwrap_or_else(|| opts.dir.clone());
    let store = ResultStore::new(output_dir);
    driver::run(&opts.dir, opts.max_order, opts.threads, opts.queue_size, &store)
}

/// Sets up `env_logger` from `--logconf` if given (one `target=level` spec
/// per line, in `env_logger`'s filter syntax), falling back to `RUST_LOG`
/// and then to `-v`/`-vv` verbosity counting.
fn init_logging(opts: &Opts) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();

    if let Some(path) = &opts.logconf {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read log configuration file {}", path.display()))?;
        builder.parse_filters(&contents);
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    } else {
        let level = match opts.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        };
        builder.filter_level(level);
    }

    builder.init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_command() {
        use clap::CommandFactory;
        Opts::command().debug_assert();
    }
}
