//! Proportional bar rendering with eighth-block resolution

/// Partial fill glyphs, one through seven eighths
const EIGHTHS: [char; 7] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];

const FULL_BLOCK: char = '█';

/// Render a proportional bar of exactly `width` columns.
///
/// The fill ratio is `value / max` clamped to 1; a zero maximum yields an
/// empty bar. Whole units render as full blocks, the fractional remainder
/// maps to the nearest of eight sub-character fill glyphs, and the rest is
/// space-padded so rendered rows keep a fixed column count.
pub fn bar(value: u64, max: u64, width: usize) -> String {
    let ratio = if max == 0 {
        0.0
    } else {
        (value as f64 / max as f64).min(1.0)
    };

    let scaled = ratio * width as f64;
    let mut full_units = scaled.floor() as usize;
    let eighths = ((scaled - full_units as f64) * 8.0).round() as usize;
    if eighths == 8 {
        full_units += 1;
    }
    full_units = full_units.min(width);

    let mut out = String::with_capacity(width * 3);
    for _ in 0..full_units {
        out.push(FULL_BLOCK);
    }

    let mut columns = full_units;
    if (1..8).contains(&eighths) && full_units < width {
        out.push(EIGHTHS[eighths - 1]);
        columns += 1;
    }

    for _ in columns..width {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bar() {
        assert_eq!(bar(0, 100, 10), " ".repeat(10));
    }

    #[test]
    fn test_full_bar() {
        assert_eq!(bar(100, 100, 10), "█".repeat(10));
    }

    #[test]
    fn test_exact_half_has_no_partial_glyph() {
        assert_eq!(bar(50, 100, 8), format!("{}    ", "█".repeat(4)));
    }

    #[test]
    fn test_partial_glyph_from_remainder() {
        // 33/100 over 10 columns: 3 full blocks plus 0.3 of a unit,
        // which rounds to 2 eighths
        let rendered = bar(33, 100, 10);
        assert_eq!(rendered.chars().count(), 10);
        assert_eq!(rendered, "███▎      ");
    }

    #[test]
    fn test_zero_max_yields_empty_bar() {
        assert_eq!(bar(5, 0, 6), " ".repeat(6));
    }

    #[test]
    fn test_value_above_max_clamps() {
        assert_eq!(bar(250, 100, 5), "█".repeat(5));
    }

    #[test]
    fn test_width_is_exact_for_all_ratios() {
        for value in 0..=100 {
            let rendered = bar(value, 100, 12);
            assert_eq!(rendered.chars().count(), 12, "value {}", value);
        }
    }
}
