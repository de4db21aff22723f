use log::{LevelFilter, debug};
use std::io::Write;

/// Environment variable whose directives refine the requested level,
/// e.g. `RUST_LOG=nutrifit::planner=trace`.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

fn build_logger(level: LevelFilter, filter_var: &str) -> env_logger::Logger {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .filter_level(level)
        .parse_env(env_logger::Env::new().filter(filter_var))
        .build()
}

/// Install the stderr logger. A second call only moves the global maximum.
pub fn init_logger(level: LevelFilter) {
    let logger = build_logger(level, LOG_FILTER_VAR);
    let max = logger.filter();
    if log::set_boxed_logger(Box::new(logger)).is_err() {
        debug!("Logger already installed, adjusting level to {}", max);
    }
    log::set_max_level(max);
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Returns false when `level` is not a recognised level name.
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(lvl) => {
            init_logger(lvl);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names_case_insensitively() {
        assert_eq!(parse_level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("Debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn filter_variable_refines_requested_level() {
        // Variable names are unique to this test so parallel tests are unaffected.
        assert_eq!(
            build_logger(LevelFilter::Warn, "NUTRIFIT_TEST_UNSET_FILTER").filter(),
            LevelFilter::Warn
        );
        unsafe { std::env::set_var("NUTRIFIT_TEST_LOG_FILTER", "nutrifit::planner=trace") };
        assert_eq!(
            build_logger(LevelFilter::Info, "NUTRIFIT_TEST_LOG_FILTER").filter(),
            LevelFilter::Trace
        );
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(!set_log_level("loud"));
    }
}
