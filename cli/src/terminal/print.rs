use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

/// Events on this target are printed verbatim, without a level symbol.
pub const PRINT_TARGET: &str = "netbelt::print";
pub const RAW_FIELD: &str = "raw_msg";

/// Width of the key column in [`as_tree_one_level`].
const TREE_KEY_WIDTH: usize = 9;

#[macro_export]
macro_rules! nprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn title(quiet: u8) {
    if quiet > 0 {
        return;
    }

    let text_content: String = format!("⟦ NETBELT v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let side: usize = TOTAL_WIDTH.saturating_sub(text_width) / 2;
    let sep: ColoredString = "═".repeat(side).color(colors::SEPARATOR);

    print(&format!("{sep}{text}{sep}"));
}

pub fn header(msg: &str, quiet: u8) {
    if quiet > 0 {
        return;
    }
    print(&header_line(msg));
}

fn header_line(msg: &str) -> String {
    let formatted: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    format!(
        "{}{}{}",
        "─".repeat(left).color(colors::SEPARATOR),
        formatted.bright_green(),
        "─".repeat(right).color(colors::SEPARATOR)
    )
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    print(&format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(key_value_pair: Vec<(String, ColoredString)>) {
    for line in tree_lines(&key_value_pair) {
        print(&line);
    }
}

fn tree_lines(key_value_pair: &[(String, ColoredString)]) -> Vec<String> {
    key_value_pair
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            let branch: ColoredString = if i + 1 == key_value_pair.len() {
                "└─".color(colors::SEPARATOR)
            } else {
                "├─".color(colors::SEPARATOR)
            };
            let dots: String = ".".repeat(TREE_KEY_WIDTH.saturating_sub(key.len()));
            format!(
                " {} {}{}{} {}",
                branch,
                key.color(colors::TEXT_DEFAULT),
                dots.color(colors::SEPARATOR),
                ":".color(colors::SEPARATOR),
                value
            )
        })
        .collect()
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}{space}"));
}

pub fn no_results(what: &str) {
    print(&format!("{}", format!("No {what} found").red().bold()));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
