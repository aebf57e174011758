//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

/// Computes 3D Zernike shape descriptors for every `.binvox` file under a
/// directory, skipping files whose descriptor has already been computed
/// for the same content hash and order.
#[derive(Parser, Debug)]
#[command(name = "zernike3d", version, about)]
pub struct Opts {
    /// Path to directory with .binvox files (searched recursively).
    #[arg(long = "dir", short = 'd', value_name = "DIR")]
    pub dir: PathBuf,

    /// Maximum order of Zernike moments (N in Novotni & Klein).
    #[arg(long = "max-order", short = 'n', value_name = "N")]
    pub max_order: usize,

    /// Number of worker threads computing descriptors concurrently.
    #[arg(long = "threads", short = 't', default_value_t = 2, value_name = "COUNT")]
    pub threads: usize,

    /// Maximum size of the bounded dispatch queue between discovery and
    /// the worker pool.
    #[arg(long = "queue-size", short = 's', default_value_t = 500, value_name = "SIZE")]
    pub queue_size: usize,

    /// Directory to write invariant files and provenance sidecars into.
    /// Defaults to the input directory.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to a log filter configuration file (one `target=level` spec
    /// per line, in `env_logger`'s filter syntax). If absent, the
    /// `RUST_LOG` environment variable and `-v`/`-vv` apply instead.
    #[arg(long = "logconf", short = 'l', value_name = "FILE")]
    pub logconf: Option<PathBuf>,

    /// Increases log verbosity; repeatable (`-v`, `-vv`).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}
