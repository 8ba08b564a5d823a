//! Row and column label cleanup
//!
//! GTAP exports label rows like `"1 PDR"` and carry `Total` rows and
//! columns. The core expects bare lower-case labels without totals.

/// Strip a leading numeric code and the spaces after it, then lower-case
///
/// A leading number that is not followed by a space is part of the label
/// and is kept.
#[must_use]
pub fn clean_label(label: &str) -> String {
    let rest = label.trim_start_matches(|c: char| c.is_ascii_digit());
    let stripped = if rest.len() < label.len() && rest.starts_with(' ') {
        rest.trim_start_matches(' ')
    } else {
        label
    };
    stripped.to_lowercase()
}

/// True for the `Total` row or column of a GTAP table
#[must_use]
pub fn is_total_label(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case("total")
}
