//! Match lines and the closing summary
use crate::entry::Entry;
use crate::search::{SearchObserver, SearchReport};
use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};
use indicatif::ProgressBar;
use std::time::SystemTime;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prints one line per match to stdout as matches arrive.
pub struct MatchPrinter {
    color: bool,
    progress: Option<ProgressBar>,
}

impl MatchPrinter {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            progress: None,
        }
    }

    /// Lines are printed with the bar suspended so they do not interleave.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn format(&self, entry: &Entry) -> String {
        if self.color {
            format_colored(entry)
        } else {
            format_plain(entry)
        }
    }
}

impl SearchObserver for MatchPrinter {
    fn on_match(&self, entry: &Entry) {
        let line = self.format(entry);
        match &self.progress {
            Some(bar) if !bar.is_hidden() => bar.suspend(|| println!("{line}")),
            _ => println!("{line}"),
        }
    }
}

fn format_colored(entry: &Entry) -> String {
    let (tag, size) = if entry.is_dir {
        ("[dir]".cyan(), String::new())
    } else {
        ("[file]".green(), human_size(entry.size))
    };
    format!(
        "{} {} {} {}",
        tag,
        entry.path.display().to_string().magenta(),
        size.blue(),
        format_time(entry.modified).yellow()
    )
}

fn format_plain(entry: &Entry) -> String {
    format!(
        "{} {} {} {}",
        mode_string(entry.mode, entry.is_dir),
        entry.path.display(),
        entry.size,
        format_time(entry.modified)
    )
}

pub fn human_size(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{:.2} {}", adjusted.get_value(), adjusted.get_unit())
}

pub fn format_time(time: Option<SystemTime>) -> String {
    match time {
        Some(t) => DateTime::<Local>::from(t).format(TIME_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

/// `ls -l` style permission string, e.g. `-rw-r--r--`.
pub fn mode_string(mode: u32, is_dir: bool) -> String {
    const SYMLINK: u32 = 0o120000;
    const TYPE_MASK: u32 = 0o170000;

    let kind = if is_dir {
        'd'
    } else if mode & TYPE_MASK == SYMLINK {
        'l'
    } else {
        '-'
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

pub fn summary_line(report: &SearchReport) -> ColoredString {
    let count = report.count();
    if report.timed_out() {
        format!("Search timed out, {count} matching files found before the deadline").yellow()
    } else if count == 0 {
        "No matching files found".yellow()
    } else {
        format!("Found {count} matching files").green()
    }
}
