//! Terminal rendering module
//!
//! Pure text composition: proportional bars, display number formatting,
//! and fixed-width box-drawn dashboard blocks. No I/O and no state.

pub mod bar;
pub mod dashboard;
pub mod format;

pub use bar::bar;
pub use dashboard::{WIDTH, bar_chart, dashboard};
pub use format::{format_count, group_thousands, pad_visible, truncate_label, visible_len};
