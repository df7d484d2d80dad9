//! Глобальный logger симуляции
//!
//! Один printer на процесс: console по умолчанию, внешний движок (или тест) может
//! подставить свой через `set_logger`. Сообщения ниже текущего уровня отбрасываются
//! ещё до форматирования timestamp'а.
//!
//! Уровень по умолчанию берётся из `FPCONTROLLER_LOG` (debug / info / warning / error).

use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard};

/// Env переменная с начальным уровнем
pub const LOG_LEVEL_ENV: &str = "FPCONTROLLER_LOG";

struct LoggerState {
    printer: Option<Box<dyn LogPrinter>>,
    level: LogLevel,
}

static LOGGER: Lazy<Mutex<LoggerState>> = Lazy::new(|| {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| LogLevel::parse(&value))
        .unwrap_or(LogLevel::Debug);

    Mutex::new(LoggerState { printer: None, level })
});

// Poisoned mutex не роняет симуляцию
fn state() -> MutexGuard<'static, LoggerState> {
    LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Заменяет текущий printer
pub fn set_logger(printer: Box<dyn LogPrinter>) {
    state().printer = Some(printer);
}

pub fn set_log_level(level: LogLevel) {
    state().level = level;
}

pub fn log_level() -> LogLevel {
    state().level
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    let state = state();
    if level < state.level {
        return;
    }

    if let Some(printer) = state.printer.as_ref() {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        printer.log(level, &format!("[{}] {}", timestamp, message));
    }
}

/// stdout для debug/info, stderr для warning/error
pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug | LogLevel::Info => println!("[{}] {}", level.as_str(), message),
            LogLevel::Warning | LogLevel::Error => eprintln!("[{}] {}", level.as_str(), message),
        }
    }
}

/// Подключает console printer, если printer ещё не задан
pub fn init_logger() {
    let mut state = state();
    if state.printer.is_none() {
        state.printer = Some(Box::new(ConsoleLogger));
    }
}
