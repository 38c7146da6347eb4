//! Build script for kairos-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates clock.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds clock.toml at build time.                   ║\n\
            ║  Please create one in the kairos-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_rtc(&config, &mut errors);
    validate_i2c(&config, &mut errors);
    validate_initial_time(&config, &mut errors);
    validate_initial_date(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in clock.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=clock.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Look up an integer key and check its range
fn check_int(
    table: &toml::Table,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(v)) if range.contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

/// Look up a boolean key
fn check_bool(table: &toml::Table, section: &str, key: &str, errors: &mut Vec<String>) -> Option<bool> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Boolean(b)) => Some(*b),
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            None
        }
    }
}

fn section<'a>(config: &'a toml::Value, name: &str, errors: &mut Vec<String>) -> Option<&'a toml::Table> {
    match config.get(name) {
        None => None,
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
    }
}

fn hour_format_is_12h(config: &toml::Value) -> bool {
    matches!(
        config.get("rtc").and_then(|rtc| rtc.get("hour_format")),
        Some(toml::Value::String(s)) if s == "12h" || s == "12"
    )
}

/// Validate the [rtc] section
fn validate_rtc(config: &toml::Value, errors: &mut Vec<String>) {
    if config.get("rtc").is_none() {
        errors.push("Missing [rtc] section".to_string());
        return;
    }
    let Some(rtc) = section(config, "rtc", errors) else {
        return;
    };

    if let Some(address) = check_int(rtc, "rtc", "address", 0..=255, errors) {
        // 8-bit write form: the R/W bit must be clear
        if address & 1 != 0 {
            errors.push("[rtc] address must be the even 8-bit write address".to_string());
        }
    }

    if let Some(format) = rtc.get("hour_format") {
        match format {
            toml::Value::String(s) if ["24h", "24", "12h", "12"].contains(&s.as_str()) => {}
            _ => errors.push("[rtc] hour_format must be '24h' or '12h'".to_string()),
        }
    }

    check_bool(rtc, "rtc", "start_oscillator", errors);
    check_int(rtc, "rtc", "poll_interval_ms", 1..=3_600_000, errors);
}

/// Validate the [i2c] section
fn validate_i2c(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(i2c) = section(config, "i2c", errors) else {
        return;
    };

    // MCP7940M supports standard and fast mode only
    check_int(i2c, "i2c", "frequency", 1_000..=400_000, errors);
}

/// Validate the [initial_time] section against the hour format
fn validate_initial_time(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(time) = section(config, "initial_time", errors) else {
        return;
    };

    let hours = if hour_format_is_12h(config) { 1..=12 } else { 0..=23 };
    check_int(time, "initial_time", "hours", hours.clone(), errors);
    check_int(time, "initial_time", "minutes", 0..=59, errors);
    check_int(time, "initial_time", "seconds", 0..=59, errors);
    check_bool(time, "initial_time", "pm", errors);

    // An omitted hour defaults to 0, which is not a 12-hour value
    if time.get("hours").is_none() && *hours.start() == 1 {
        errors.push("[initial_time] hours is required in 12h format".to_string());
    }
}

/// Validate the [initial_date] section
fn validate_initial_date(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(date) = section(config, "initial_date", errors) else {
        return;
    };

    check_int(date, "initial_date", "day", 1..=31, errors);
    check_int(date, "initial_date", "month", 1..=12, errors);

    if let Some(toml::Value::Integer(year)) = date.get("year") {
        if !(0..=99).contains(year) && !(2000..=2099).contains(year) {
            errors.push("[initial_date] year must be 0-99 or 2000-2099".to_string());
        }
    } else if date.get("year").is_some() {
        errors.push("[initial_date] year must be an integer".to_string());
    }
}
