//! Setup for the swarm store logging.
//!
//! It redirects the `tracing` events to the standard output with the threshold
//! defined in the configuration:
//!
//! - `Off`
//! - `Error`
//! - `Warn`
//! - `Info`
//! - `Debug`
//! - `Trace`
//!
//! A host that installs its own subscriber does not need to call [`setup`].
use std::sync::Once;

use torrust_tracker_configuration::{Configuration, LogStyle, Threshold};
use tracing::info;
use tracing::level_filters::LevelFilter;

static INIT: Once = Once::new();

/// It redirects the log info to the standard output with the threshold and
/// style defined in the configuration. Only the first call has any effect.
pub fn setup(cfg: &Configuration) {
    let tracing_level = map_to_tracing_level_filter(cfg.logging.threshold);

    if tracing_level == LevelFilter::OFF {
        return;
    }

    let style = TraceStyle::from(cfg.logging.style);

    INIT.call_once(|| {
        tracing_stdout_init(tracing_level, &style);
    });
}

fn map_to_tracing_level_filter(threshold: Threshold) -> LevelFilter {
    match threshold {
        Threshold::Off => LevelFilter::OFF,
        Threshold::Error => LevelFilter::ERROR,
        Threshold::Warn => LevelFilter::WARN,
        Threshold::Info => LevelFilter::INFO,
        Threshold::Debug => LevelFilter::DEBUG,
        Threshold::Trace => LevelFilter::TRACE,
    }
}

fn tracing_stdout_init(filter: LevelFilter, style: &TraceStyle) {
    let builder = tracing_subscriber::fmt().with_max_level(filter).with_ansi(true);

    let () = match style {
        TraceStyle::Default => builder.init(),
        TraceStyle::Pretty => builder.pretty().with_file(true).init(),
        TraceStyle::Compact => builder.compact().init(),
        TraceStyle::Json => builder.json().init(),
    };

    info!("Logging initialized with {style}");
}

#[derive(Debug, PartialEq, Eq)]
pub enum TraceStyle {
    Default,
    Pretty,
    Compact,
    Json,
}

impl From<LogStyle> for TraceStyle {
    fn from(style: LogStyle) -> Self {
        match style {
            LogStyle::Full => TraceStyle::Default,
            LogStyle::Pretty => TraceStyle::Pretty,
            LogStyle::Compact => TraceStyle::Compact,
            LogStyle::Json => TraceStyle::Json,
        }
    }
}

impl std::fmt::Display for TraceStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let style = match self {
            TraceStyle::Default => "Default Style",
            TraceStyle::Pretty => "Pretty Style with File Paths",
            TraceStyle::Compact => "Compact Style",
            TraceStyle::Json => "Json Format",
        };

        f.write_str(style)
    }
}
