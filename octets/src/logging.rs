//! Thin re-export of the `slog` vocabulary used throughout both dialects, mirroring
//! `flux::logging` in the teacher: call sites write `logging::debug!(self.log, "...";
//! "key" => value)` without depending on `slog` directly.

pub use slog::{debug, error, info, o, trace, warn, Discard, Logger};

/// Builds a root logger from a `sloggers`-style TOML config, the way
/// `flux::logging::init` parses its hard-coded terminal-outputter config. Returns a
/// discarding logger if the config fails to parse, since a broken logging config must
/// never prevent the transport from running.
pub fn init_from_toml(toml: &str) -> Logger {
    use sloggers::Config;

    let config: Result<sloggers::LoggerConfig, _> = serdeconv::from_toml_str(toml);

    match config.ok().and_then(|cfg| cfg.build_logger().ok()) {
        Some(logger) => logger,
        None => Logger::root(Discard, o!()),
    }
}

/// A root logger that discards everything, used as the default when no logger is
/// supplied (matches `Channel::new`'s `Into<Option<&Logger>>` pattern in the teacher).
pub fn discard() -> Logger {
    Logger::root(Discard, o!())
}
