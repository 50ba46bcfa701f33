//! ASCII bar charts for terminal output.
//!
//! This is intentionally "dumb" (fixed width, one bar per row), optimized for:
//! - quick visual comparison of section averages in a terminal
//! - deterministic output (helpful for golden tests)

/// Render one horizontal bar per `(label, value)` on a `[0, scale_max]` axis.
///
/// Values are clamped into the axis; non-finite values render as an empty bar.
pub fn render_bar_chart(items: &[(String, f64)], scale_max: f64, width: usize) -> String {
    let width = width.max(10);
    let scale_max = if scale_max.is_finite() && scale_max > 0.0 { scale_max } else { 1.0 };
    let label_width = items
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    let mut out = String::new();
    for (label, value) in items {
        let value = *value;
        let filled = if value.is_finite() {
            ((value.clamp(0.0, scale_max) / scale_max) * width as f64).round() as usize
        } else {
            0
        };
        let bar: String = "#".repeat(filled) + &" ".repeat(width - filled);
        out.push_str(&format!(
            "{:<label_width$} |{bar}| {value:>6.2}\n",
            truncate(label, label_width),
        ));
    }
    out
}

/// Cut `s` to at most `max` characters, marking the cut with a trailing `.`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
