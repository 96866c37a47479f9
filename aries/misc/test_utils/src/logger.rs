use std::{env, io::Write, sync::Once};

use chrono::Local;
use env_logger::{fmt::Formatter, Builder as EnvLoggerBuilder};
use log::{LevelFilter, Record};

use crate::errors::error::{TestUtilsError, TestUtilsResult};

static TEST_LOGGING_INIT: Once = Once::new();

/// Installs [TestLogger] once per test binary, only when `RUST_LOG` is set.
pub fn init_logger() {
    TEST_LOGGING_INIT.call_once(|| {
        if let Ok(pattern) = env::var("RUST_LOG") {
            if let Err(err) = TestLogger::init(Some(pattern)) {
                eprintln!("{}", err);
            }
        }
    })
}

pub struct TestLogger;

/// One line per record: `time|level|target|file:line| message`.
fn write_record(buf: &mut Formatter, record: &Record, colored: bool) -> std::io::Result<()> {
    let time = Local::now().format("%Y-%m-%d %H:%M:%S.%f");
    let level = record.level();
    let location = format!(
        "{:>35}:{:<4}",
        record.file().unwrap_or(""),
        record.line().unwrap_or(0)
    );
    if colored {
        let style = buf.default_level_style(level);
        writeln!(
            buf,
            "{time}|{style}{level:>5}{style:#}|{:<30}|{location}| {}",
            record.target(),
            record.args()
        )
    } else {
        writeln!(
            buf,
            "{time}|{level:>5}|{:<30}|{location}| {}",
            record.target(),
            record.args()
        )
    }
}

impl TestLogger {
    /// `pattern` follows `RUST_LOG` syntax and defaults to `warn`. Set
    /// `RUST_LOG_FORMATTER=text_no_color` for plain output.
    pub fn init(pattern: Option<String>) -> TestUtilsResult<()> {
        let pattern = pattern.or(env::var("RUST_LOG").ok());
        let colored = env::var("RUST_LOG_FORMATTER").as_deref() != Ok("text_no_color");
        EnvLoggerBuilder::new()
            .format(move |buf, record| write_record(buf, record, colored))
            .filter(None, LevelFilter::Off)
            .parse_filters(pattern.as_deref().unwrap_or("warn"))
            .try_init()
            .map_err(|err| {
                TestUtilsError::LoggingError(format!("Cannot init logger: {:?}", err))
            })?;
        Ok(())
    }
}
