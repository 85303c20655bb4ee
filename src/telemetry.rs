//! Console logging.
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`). Set
//! `JAVLABOT_LOG_FORMAT=json` for one JSON object per line.

use std::fmt;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "JAVLABOT_LOG_FORMAT";

/// UTC timestamps to the second, e.g. `2024-05-01 12:34:56`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcSeconds;

impl FormatTime for UtcSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Keeps logging alive for the life of the process.
#[must_use]
pub struct Telemetry;

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init() -> Telemetry {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcSeconds)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    Telemetry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_shape() {
        let mut out = String::new();
        UtcSeconds.format_time(&mut Writer::new(&mut out)).unwrap();
        assert_eq!(out.len(), "2024-05-01 12:34:56".len());
        assert_eq!(&out[4..5], "-");
        assert_eq!(&out[10..11], " ");
    }

    #[test]
    fn init_twice_is_harmless() {
        let _first = init();
        let _second = init();
    }
}
