//! Default logging setup for the truth table toolkit
#![warn(missing_docs)]

use std::{sync::Mutex, time::Instant};

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

/// Environment variable holding the log filter, e.g. `TTAB_LOG=ttab_table=debug`.
pub const LOG_ENV: &str = "TTAB_LOG";

/// Environment variable controlling colored output (`auto`, `always` or `never`).
pub const LOG_STYLE_ENV: &str = "TTAB_LOG_STYLE";

/// Perform the default logging setup used by the `ttab` binary.
///
/// Every record is prefixed with the time elapsed since setup. Whenever the log target changes
/// a header line naming the new target is emitted, so consecutive records from the same pipeline
/// stage are grouped together.
pub fn setup() {
    let start_time = Instant::now();
    let last_target = Mutex::new(String::new());

    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(LOG_ENV, "info")
            .write_style(LOG_STYLE_ENV),
    )
    .format(move |buf, record| {
        use std::io::Write;

        let timestamp = start_time.elapsed();
        let level = record.level();
        let target = record.target();

        let mut last_target = last_target.lock().unwrap_or_else(|err| err.into_inner());

        if target != *last_target {
            last_target.clear();
            last_target.push_str(target);

            writeln!(
                buf,
                "{} {}",
                format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
                format_args!("{style}{target}{style:#}", style = TARGET_STYLE)
            )?;
        }
        writeln!(
            buf,
            "{} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!(
                "{style}{level:5}{style:#}",
                style = buf.default_level_style(level),
            ),
            record.args(),
        )
    })
    .init();
}

/// Logging setup for unit and integration tests.
///
/// Uses `filter` unless [`LOG_ENV`] is set and routes output through the test harness's capture.
/// Safe to call from every test, only the first call installs the logger.
pub fn test_setup(filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, filter))
        .is_test(true)
        .try_init();
}
