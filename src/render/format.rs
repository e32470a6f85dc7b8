//! Number and width formatting helpers
//!
//! Padding is computed on visible glyphs, not emitted bytes, so rows that
//! embed ANSI color codes still line up with the box borders.

/// Format a count for display. Lossy by design.
///
/// Millions get one decimal and an "M" suffix, tens of thousands a whole
/// "K", thousands comma grouping, anything smaller renders verbatim.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 10_000 {
        format!("{}K", n / 1_000)
    } else if n >= 1_000 {
        group_thousands(n)
    } else {
        n.to_string()
    }
}

/// Insert comma grouping separators into a whole number
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Count of visible glyphs, excluding ANSI escape sequences
pub fn visible_len(s: &str) -> usize {
    let mut len = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip the escape sequence through its terminating letter
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

/// Pad with trailing spaces to `width` visible columns
pub fn pad_visible(s: &str, width: usize) -> String {
    let len = visible_len(s);
    if len >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + width - len);
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Truncate a plain (uncolored) string to at most `max` glyphs
pub fn truncate_label(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_tiers() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_500), "1,500");
        assert_eq!(format_count(15_000), "15K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn test_format_count_tier_boundaries() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(9_999), "9,999");
        assert_eq!(format_count(10_000), "10K");
        assert_eq!(format_count(999_999), "999K");
        assert_eq!(format_count(1_000_000), "1.0M");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1), "1");
        assert_eq!(group_thousands(1_234), "1,234");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_visible_len_ignores_color_codes() {
        let colored_text = "\x1b[31mabc\x1b[0m";
        assert!(colored_text.len() > 3);
        assert_eq!(visible_len(colored_text), 3);
    }

    #[test]
    fn test_pad_visible_counts_glyphs_not_bytes() {
        let padded = pad_visible("\x1b[32mab\x1b[0m", 5);
        assert_eq!(visible_len(&padded), 5);
        assert!(padded.ends_with("   "));
    }

    #[test]
    fn test_pad_visible_plain() {
        assert_eq!(pad_visible("ab", 5), "ab   ");
        assert_eq!(pad_visible("abcdef", 5), "abcdef");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("averylongdomainname.example", 10), "averylong…");
    }
}
