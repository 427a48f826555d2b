//! Process-wide `tracing` setup shared by the bot binary.
//!
//! One compact, single-line fmt layer with RFC3339 UTC timestamps, filtered by
//! `RUST_LOG` (fallback given by the caller).

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crate targets that make up the bot; used for per-crate level directives.
pub const BOT_TARGETS: [&str; 3] = ["api", "mr_reviewer", "ai_llm_service"];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Formatting layer:
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with level and target
/// - Span close events (duration of instrumented handlers/tasks)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    fmt::layer()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
}

/// Level directives for every bot crate, e.g. `mr_reviewer=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    BOT_TARGETS
        .iter()
        .filter_map(|t| {
            let s = format!("{t}={}", level.as_str().to_lowercase());
            Directive::from_str(&s).ok()
        })
        .collect()
}

/// `RUST_LOG` if set, otherwise `default` plus `level` for the bot crates.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    level_directives(level)
        .into_iter()
        .fold(EnvFilter::new(default), |f, d| f.add_directive(d))
}

/// Installs the global subscriber. Returns `false` if one was already set
/// (e.g. by a test harness).
pub fn init(default: &str, level: Level) -> bool {
    tracing_subscriber::registry()
        .with(env_filter_with_level(default, level))
        .with(layer())
        .try_init()
        .is_ok()
}
