//! Large numbers in words, such as `1.23 million`.

use crate::names::MAGNITUDES;

/// The smallest magnitude that is humanized.
pub const MIN_HUMANIZED: f64 = 1e6;

/// Magnitudes above this are reported as infinite.
pub const MAX_FINITE: f64 = 1e35;

/// Non-zero magnitudes below this are reported as zero.
pub const MIN_NONZERO: f64 = 1e-35;

/// Formats a number with three significant digits, trimming trailing zeros.
fn three_digits(value: f64) -> (f64, String) {
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    let text = format!("{:.*}", decimals, rounded);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    (rounded, text)
}

/// Writes the number with three significant digits and a magnitude word, such as `1.23 million`.
/// Returns [`None`] if the magnitude is outside `[10^6, 10^35]`.
pub fn humanize(value: f64) -> Option<String> {
    let magnitude = value.abs();
    if !(MIN_HUMANIZED..=MAX_FINITE).contains(&magnitude) {
        return None;
    }

    let index = MAGNITUDES.iter()
        .rposition(|(_, power)| 10f64.powi(*power as i32) <= magnitude)?;
    let (word, power) = MAGNITUDES[index];
    let (rounded, text) = three_digits(magnitude / 10f64.powi(power as i32));

    // 999.9 million rounds to 1000 million, which is written as 1 billion
    let (text, word) = match MAGNITUDES.get(index + 1) {
        Some((next, _)) if rounded >= 1000.0 => (three_digits(rounded / 1000.0).1, *next),
        _ => (text, word),
    };

    let sign = if value < 0.0 { "-" } else { "" };
    Some(format!("{}{} {}", sign, text, word))
}
