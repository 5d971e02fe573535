//! Library half of the `logbrowser` binary, split out so the subcommands can
//! be exercised from tests.

pub mod config;
mod find_cmd;
mod first_timestamp_cmd;
mod timestamp;

pub use config::BrowserConfig;
pub use find_cmd::FindCommand;
pub use find_cmd::render_paths;
pub use first_timestamp_cmd::FirstTimestampCommand;
pub use timestamp::format_timestamp;
pub use timestamp::parse_timestamp;

use supports_color::Stream;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Log to stderr, filtered by `RUST_LOG` and defaulting to warnings.
pub fn init_tracing() {
    let default_level = "warn";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(supports_color::on_cached(Stream::Stderr).is_some())
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
