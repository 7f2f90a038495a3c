use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Targets of the workspace crates; events from anything else (hyper, mongodb
/// driver internals, ...) are left to the caller's own layers.
pub const SERVICE_TARGETS: &[&str] = &["ai_llm_service", "question_tagger", "api", "tagger_backend"];

/// HTTP request spans and responses; always kept at INFO so access logs show
/// under a `warn` dependency default.
pub const REQUEST_TRACE_DIRECTIVE: &str = "tower_http::trace=info";

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

fn is_service_target(target: &str) -> bool {
    SERVICE_TARGETS.iter().any(|p| target.starts_with(p))
}

/// Formatting layer that renders ONLY events emitted by the service crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - Span close events (duration at the end of instrumented spans)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_service = filter::filter_fn(|meta| is_service_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_service)
}

/// Plain layer for everything that is NOT a service crate (libraries,
/// tower-http request traces). Keeps the two streams from duplicating.
pub fn foreign_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let not_service = filter::filter_fn(|meta| !is_service_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_ansi(use_ansi)
        .compact()
        .with_filter(not_service)
}

/// Builds `target=level` directives for every service crate, followed by
/// [`REQUEST_TRACE_DIRECTIVE`].
pub fn level_directives(level: Level) -> Result<Vec<Directive>, ParseError> {
    let level = level.as_str().to_lowercase();
    SERVICE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .chain(std::iter::once(REQUEST_TRACE_DIRECTIVE.to_string()))
        .map(|d| d.parse::<Directive>())
        .collect()
}

/// `EnvFilter` from `RUST_LOG` when set; otherwise `default` for dependencies
/// and `level` for the service crates.
///
/// Example: `default = "warn"`, `level = Level::INFO` shows WARN for
/// dependencies and INFO for this workspace.
pub fn env_filter_with_level(default: &str, level: Level) -> Result<EnvFilter, ParseError> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }
    let base = EnvFilter::try_new(default)?;
    Ok(level_directives(level)?
        .into_iter()
        .fold(base, |f, d| f.add_directive(d)))
}
