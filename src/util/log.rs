// 標準エラー出力へのログ ([LEVEL](file:line) message)
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

pub fn set_log_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn enabled(level: Level) -> bool {
    level as u8 <= LOG_LEVEL.load(Ordering::Relaxed)
}

pub fn write(level: Level, file: &str, line: u32, args: fmt::Arguments<'_>) {
    if enabled(level) {
        eprintln!("[{}]({}:{}) {}", level.label(), file, line, args);
    }
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::util::log::write(
            $crate::util::log::Level::Error,
            file!(),
            line!(),
            format_args!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::util::log::write(
            $crate::util::log::Level::Warn,
            file!(),
            line!(),
            format_args!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::util::log::write(
            $crate::util::log::Level::Info,
            file!(),
            line!(),
            format_args!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::util::log::write(
            $crate::util::log::Level::Debug,
            file!(),
            line!(),
            format_args!($($arg)*),
        )
    };
}

#[test]
fn test_log_level() {
    assert!(enabled(Level::Error));
    assert!(Level::Warn < Level::Debug);
}
