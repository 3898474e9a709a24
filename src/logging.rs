use std::fs::File;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger.
///
/// The terminal belongs to the canvas, so records go to `log_file` when one
/// is given.  Without a file logging stays off unless `RUST_LOG` says
/// otherwise.  When `verbose` is `true`, debug messages are included;
/// otherwise only info level and above are written.
pub fn init(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
    let level = match (log_file, verbose) {
        (None, _) => LevelFilter::Off,
        (Some(_), true) => LevelFilter::Debug,
        (Some(_), false) => LevelFilter::Info,
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
    Ok(())
}
