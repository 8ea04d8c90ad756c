//! Shared plumbing for the `terrain` and `splat` binaries.
pub mod artifact;
pub mod colormap;
pub mod report;

use env_logger::Env;

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

/// Read all of stdin; the numeric configuration arrives there.
pub fn read_stdin() -> anyhow::Result<String> {
    use anyhow::Context;
    use std::io::Read;

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text).context("cannot read configuration from stdin")?;
    Ok(text)
}
