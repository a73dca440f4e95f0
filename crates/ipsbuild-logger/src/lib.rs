//! Console and log file output for ipsbuild
//!
//! Every message lands in the log file. Whether it also reaches stderr
//! depends on its [`Level`] and the verbosity set by `-v`/`-vv`. While a
//! spinner is running, console lines are printed above it.

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

const LOG_FILE_NAME: &str = "ipsbuild.log";

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSITY: Mutex<u8> = Mutex::new(0);
static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Kind of a logged message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Step,
    Debug,
    Info,
    Warn,
    Error,
    Success,
}

impl Level {
    /// Tag written in front of the message in the log file
    pub fn tag(self) -> &'static str {
        match self {
            Level::Step => "STEP",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Success => "OK",
        }
    }

    /// Lowest verbosity at which the message is printed to stderr
    pub fn console_verbosity(self) -> u8 {
        match self {
            Level::Step => 2,
            Level::Debug | Level::Info => 1,
            Level::Warn | Level::Error | Level::Success => 0,
        }
    }

    fn console_prefix(self) -> Option<ColoredString> {
        match self {
            Level::Step => Some("TRACE:".dimmed()),
            Level::Debug => Some("DEBUG:".blue().bold()),
            Level::Info => None,
            Level::Warn => Some("warning:".yellow().bold()),
            Level::Error => Some("Error:".red().bold()),
            Level::Success => Some("\u{2714}".green().bold()),
        }
    }
}

/// A log file line without its timestamp
pub fn format_entry(level: Level, message: &str) -> String {
    format!("{} {}", level.tag(), message)
}

pub fn get_verbosity() -> u8 {
    VERBOSITY.lock().ok().map_or(0, |v| *v)
}

/// Set the verbosity and the log file for this run
///
/// 0 = warnings and errors only, 1 = debug (-v), 2 = trace (-vv).
/// `log_file` overrides the default `<config dir>/ipsbuild/ipsbuild.log`.
/// An existing log file is truncated.
pub fn init_with_verbosity(verbosity: u8, log_file: Option<PathBuf>) -> Result<(), String> {
    if let Ok(mut v) = VERBOSITY.lock() {
        *v = verbosity;
    }

    let log_file = match log_file {
        Some(path) => path,
        None => log_dir()?.join(LOG_FILE_NAME),
    };
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create log directory: {}", e))?;
    }
    if log_file.exists() {
        let _ = fs::remove_file(&log_file);
    }

    let mut guard = LOG_FILE
        .lock()
        .map_err(|_| "Log file lock poisoned".to_string())?;
    *guard = Some(log_file);
    Ok(())
}

fn log_dir() -> Result<PathBuf, String> {
    #[cfg(not(target_os = "windows"))]
    let dir = dirs::home_dir()
        .ok_or("Could not determine home directory")?
        .join(".config");

    #[cfg(target_os = "windows")]
    let dir = dirs::config_dir().ok_or("Could not determine config directory")?;

    Ok(dir.join("ipsbuild"))
}

fn append_to_log(line: &str) {
    let Some(path) = get_log_path() else {
        return;
    };
    append_line(&path, line);
}

fn append_line(log_path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {}", timestamp, line);
    }
}

/// Print to stderr, above the spinner if one is running
fn print_console(line: &str) {
    if let Ok(guard) = SPINNER.lock() {
        if let Some(spinner) = guard.as_ref() {
            spinner.suspend(|| eprintln!("{}", line));
            return;
        }
    }
    eprintln!("{}", line);
}

/// Write `message` to the log file and, verbosity permitting, to stderr
pub fn log(level: Level, message: &str) {
    append_to_log(&format_entry(level, message));
    if get_verbosity() < level.console_verbosity() {
        return;
    }
    match level.console_prefix() {
        Some(prefix) => print_console(&format!("{} {}", prefix, message)),
        None => print_console(message),
    }
}

pub fn info(message: &str) {
    log(Level::Info, message);
}

pub fn debug(message: &str) {
    log(Level::Debug, message);
}

pub fn warn(message: &str) {
    log(Level::Warn, message);
}

pub fn error(message: &str) {
    log(Level::Error, message);
}

pub fn success(message: &str) {
    log(Level::Success, message);
}

/// One stage of a build; shown on the console at -vv only
pub fn step(message: &str) {
    log(Level::Step, message);
}

/// Record a subprocess' exit status and output in the log file
pub fn capture_output(command_name: &str, output: &std::process::Output) {
    append_to_log(&format!(
        "COMMAND {} exited with {:?}",
        command_name,
        output.status.code()
    ));
    for (stream, bytes) in [("stdout", &output.stdout), ("stderr", &output.stderr)] {
        if !bytes.is_empty() {
            append_to_log(&format!("  {}:\n{}", stream, String::from_utf8_lossy(bytes)));
        }
    }
}

pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

/// Tell the user where the log file is
pub fn show_log_path() {
    match get_log_path().map_or_else(|| log_dir().map(|d| d.join(LOG_FILE_NAME)), Ok) {
        Ok(path) => eprintln!("Log file: {}", path.display()),
        Err(_) => eprintln!("Log file location not available"),
    }
}

/// Show a spinner until the next `spinner_*` call; skipped when verbose,
/// where debug lines would interleave with it
pub fn spinner_start(message: &str) {
    if get_verbosity() > 0 {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&SPINNER_FRAMES)
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    if let Ok(mut guard) = SPINNER.lock() {
        *guard = Some(spinner);
    }
}

pub fn spinner_success(message: &str) {
    spinner_stop();
    success(message);
}

/// Clear the spinner and report the stage that failed
pub fn spinner_error(message: &str) {
    spinner_stop();
    append_to_log(&format_entry(Level::Error, message));
    eprintln!("{} {}", "\u{2717}".red().bold(), message);
}

pub fn spinner_stop() {
    let spinner = SPINNER.lock().ok().and_then(|mut guard| guard.take());
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}
