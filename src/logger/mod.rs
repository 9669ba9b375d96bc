//! Logger module
//!
//! Provides logging utilities for the site server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled error, warning, info and debug lines
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::{Config, LoggingConfig};
use chrono::Local;
use std::io;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let level = config
        .level
        .parse::<Level>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
        level,
    )
}

fn enabled(level: Level) -> bool {
    writer::get().map_or(level <= Level::Info, |w| level <= w.level())
}

fn stamp(tag: &str, message: &str) -> String {
    format!("{} [{tag}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S"))
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_error(message: &str) {
    if enabled(Level::Error) {
        write_error(&stamp("ERROR", message));
    }
}

pub fn log_warning(message: &str) {
    if enabled(Level::Warn) {
        write_error(&stamp("WARN", message));
    }
}

pub fn log_info(message: &str) {
    if enabled(Level::Info) {
        write_info(&stamp("INFO", message));
    }
}

pub fn log_debug(message: &str) {
    if enabled(Level::Debug) {
        write_info(&stamp("DEBUG", message));
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, backend: &str) {
    write_info("======================================");
    write_info("Contact site started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!("Templates: {}", config.site.template_dir));
    write_info(&format!("Static assets: {}", config.site.static_dir));
    write_info(&format!("Message storage: {backend}"));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// Log which storage backend this process will use for its whole lifetime
pub fn log_storage_selected(backend: &str, config: &Config) {
    match backend {
        "sqlite" => log_info(&format!(
            "Storing messages in SQLite file {}",
            config.storage.sqlite_path
        )),
        other => log_info(&format!(
            "Storing messages in {other} (connection string from {})",
            crate::config::DATABASE_URL_VAR
        )),
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("Accepted connection from {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown_started(open_connections: usize) {
    log_info(&format!(
        "Shutdown requested, waiting for {open_connections} open connection(s)"
    ));
}

pub fn log_shutdown_complete(drained: bool) {
    if drained {
        log_info("All connections closed, server stopped");
    } else {
        log_warning("Shutdown timeout elapsed, dropping remaining connections");
    }
}
