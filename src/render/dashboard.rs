//! Fixed-width dashboard and bar-chart composition
//!
//! Pure functions over the typed API responses. Sections backed by empty
//! data are omitted; emitted rows are always exactly `WIDTH` visible
//! columns so the borders stay aligned.

use colored::{Color, Colorize};

use crate::pihole::types::{ClientCount, DomainCount, StatsSummary};

use super::bar::bar;
use super::format::{format_count, group_thousands, pad_visible, truncate_label, visible_len};

/// Overall rendered width in columns
pub const WIDTH: usize = 78;

/// Interior width between "│ " and " │"
const INNER: usize = WIDTH - 4;

const LABEL_WIDTH: usize = 24;
const COUNT_WIDTH: usize = 7;
const BAR_WIDTH: usize = INNER - LABEL_WIDTH - COUNT_WIDTH - 2;

fn top_border(title: &str) -> String {
    let head = format!("┌─ {} ", title);
    let fill = WIDTH.saturating_sub(visible_len(&head) + 1);
    format!("{}{}┐", head, "─".repeat(fill))
}

fn divider(title: &str) -> String {
    let head = format!("├─ {} ", title);
    let fill = WIDTH.saturating_sub(visible_len(&head) + 1);
    format!("{}{}┤", head, "─".repeat(fill))
}

fn separator() -> String {
    format!("├{}┤", "─".repeat(WIDTH - 2))
}

fn bottom_border() -> String {
    format!("└{}┘", "─".repeat(WIDTH - 2))
}

fn row(content: &str) -> String {
    format!("│ {} │", pad_visible(content, INNER))
}

/// One ranked row: padded label, proportional bar, right-aligned count
fn ranked_row(label: &str, count: u64, max: u64, color: Color) -> String {
    let label = pad_visible(&truncate_label(label, LABEL_WIDTH), LABEL_WIDTH);
    let bar = bar(count, max, BAR_WIDTH).color(color).to_string();
    // Absurd counts format wider than the column; clamp to hold the width
    let count_text = truncate_label(&format_count(count), COUNT_WIDTH);
    row(&format!(
        "{} {} {:>width$}",
        label,
        bar,
        count_text,
        width = COUNT_WIDTH
    ))
}

fn ranked_section(out: &mut Vec<String>, title: &str, entries: &[(&str, u64)], color: Color) {
    let max = entries.iter().map(|(_, count)| *count).max().unwrap_or(0);
    out.push(divider(title));
    for (label, count) in entries {
        out.push(ranked_row(label, *count, max, color));
    }
}

/// Compose the full dashboard block.
///
/// The summary section is always emitted; the three ranked sections only
/// when their backing data is non-empty.
pub fn dashboard(
    summary: &StatsSummary,
    top_clients: &[ClientCount],
    top_blocked: &[DomainCount],
    top_permitted: &[DomainCount],
) -> String {
    let mut out = Vec::new();
    out.push(top_border("Pi-hole"));

    let percent = format!("{:.1}%", summary.queries.percent_blocked);
    let left = format!(
        "Total queries   {}",
        group_thousands(summary.queries.total).cyan()
    );
    let right = format!(
        "Blocked     {} ({})",
        group_thousands(summary.queries.blocked).red(),
        percent.yellow()
    );
    out.push(row(&format!("{}{}", pad_visible(&left, 38), right)));

    let left = format!(
        "Active clients  {}",
        group_thousands(summary.clients.active).cyan()
    );
    let right = format!(
        "Blocklist   {} domains",
        format_count(summary.gravity.domains_being_blocked).magenta()
    );
    out.push(row(&format!("{}{}", pad_visible(&left, 38), right)));

    if !top_clients.is_empty() {
        let entries: Vec<(&str, u64)> = top_clients
            .iter()
            .map(|c| (c.label(), c.count))
            .collect();
        ranked_section(&mut out, "Top Clients", &entries, Color::Cyan);
    }

    if !top_blocked.is_empty() {
        let entries: Vec<(&str, u64)> = top_blocked
            .iter()
            .map(|d| (d.domain.as_str(), d.count))
            .collect();
        ranked_section(&mut out, "Top Blocked Domains", &entries, Color::Red);
    }

    if !top_permitted.is_empty() {
        let entries: Vec<(&str, u64)> = top_permitted
            .iter()
            .map(|d| (d.domain.as_str(), d.count))
            .collect();
        ranked_section(&mut out, "Top Permitted Domains", &entries, Color::Green);
    }

    out.push(bottom_border());
    out.join("\n")
}

/// Compose a standalone ranked bar chart block
pub fn bar_chart(title: &str, entries: &[(&str, u64)], total_queries: u64) -> String {
    let mut out = Vec::new();
    out.push(top_border(title));

    if entries.is_empty() {
        out.push(row("(no data)"));
    } else {
        let max = entries.iter().map(|(_, count)| *count).max().unwrap_or(0);
        for (label, count) in entries {
            out.push(ranked_row(label, *count, max, Color::Blue));
        }
    }

    out.push(separator());
    out.push(row(&format!(
        "Total queries: {}",
        group_thousands(total_queries)
    )));
    out.push(bottom_border());
    out.join("\n")
}
