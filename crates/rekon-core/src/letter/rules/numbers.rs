//! Locale-agnostic number normalization.

use tracing::warn;

/// Convert a formatted number (`1.057.000`, `1,057`, `1.234,56`) to an integer.
///
/// Every character that is not an ASCII digit is dropped, so thousands and
/// decimal separators as well as stray control characters disappear. Empty
/// input, input without digits, and values that do not fit in a `u64` all
/// yield `0`.
pub fn normalize(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or_else(|e| {
        warn!("Number {:?} out of range, using 0: {}", raw, e);
        0
    })
}
