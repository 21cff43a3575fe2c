use std::sync::Arc;

use colored::*;
use indicatif::ProgressStyle;
use netbelt_core::ProgressFn;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

const QUIT_TIP: &str = "press 'q' to finish early";

pub fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .map(|style| style.tick_strings(TICKS))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Span whose progress bar lives as long as the instrumented work.
pub fn activity(message: &str, show_tip: bool) -> Span {
    let span = info_span!("activity", indicatif.pb_show = true);
    span.pb_set_message(&with_tip(message, show_tip));
    span
}

/// Turns a running count into spinner updates on `span`.
pub fn count_reporter(span: &Span, noun: &'static str) -> ProgressFn {
    let span = span.clone();
    Arc::new(move |count: usize| {
        span.pb_set_message(&progress_message(count, noun));
    })
}

fn progress_message(count: usize, noun: &str) -> String {
    format!(
        "Found {} so far...",
        format!("{count} {noun}").green().bold()
    )
    .color(colors::TEXT_DEFAULT)
    .to_string()
}

fn with_tip(message: &str, show_tip: bool) -> String {
    if show_tip {
        format!("{message} {}", format!("({QUIT_TIP})").italic().dimmed())
    } else {
        message.to_string()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
