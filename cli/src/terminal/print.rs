use std::time::Duration;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use cdnstrip_common::success;
use cdnstrip_core::aggregator::Counters;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "cdnstrip::print";

pub fn print(msg: &str) {
    info!(target: "cdnstrip::print", raw_msg = msg);
}

pub fn banner(quiet: bool) {
    if quiet {
        return;
    }

    let text_content: String = format!("⟦ CDNSTRIP v{} ⟧", env!("CARGO_PKG_VERSION"));
    print(&framed(&text_content, "═"));
}

pub fn header(msg: &str) {
    print(&framed(&format!("⟦ {} ⟧", msg.to_uppercase()), "─"));
}

fn framed(text: &str, fill: &str) -> String {
    let text_width: usize = UnicodeWidthStr::width(text);
    let dash_count: usize = TOTAL_WIDTH.saturating_sub(text_width);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    format!(
        "{}{}{}",
        fill.repeat(left).color(colors::SEPARATOR),
        text.color(colors::PRIMARY).bold(),
        fill.repeat(right).color(colors::SEPARATOR)
    )
}

pub fn aligned_line(key: &str, value: ColoredString, key_width: usize) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(console::measure_text_width(key)));
    print(&format!(
        "{} {}{}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::TEXT_DEFAULT),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value
    ));
}

fn summary_rows(counters: Counters) -> [(&'static str, ColoredString); 4] {
    [
        ("Kept", counters.valid.to_string().color(colors::PRIMARY)),
        ("CDN", counters.matched.to_string().color(colors::MATCHED)),
        ("Invalid", counters.invalid.to_string().color(colors::INVALID)),
        ("Total", counters.total().to_string().color(colors::ACCENT)),
    ]
}

/// Final report once every worker has been joined. Nothing is printed when quiet.
pub fn summary(counters: Counters, elapsed: Duration, quiet: bool) {
    if quiet {
        return;
    }
    header("summary");
    let rows = summary_rows(counters);
    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        aligned_line(key, value, key_width);
    }
    success!("Finished in {:.2}s {counters}", elapsed.as_secs_f64());
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
