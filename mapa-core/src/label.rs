//! Parcel-area label detection.

/// Unit suffix of parcel-area labels (hectares).
pub const AREA_UNIT: &str = "ha";

/// Whether `text` is a parcel-area label: an unsigned decimal number,
/// optional whitespace, then the area unit, matched case-insensitively.
///
/// `"3.5 ha"`, `"12ha"` and `"0.75 HA"` match; `"3.5 hb"`, `"ha"`,
/// `".5 ha"` and `"3.5 ha total"` do not.
#[must_use]
pub fn is_area_label(text: &str) -> bool {
    let Some(rest) = strip_digits(text) else {
        return false;
    };
    let rest = match rest.strip_prefix('.') {
        Some(fraction) => match strip_digits(fraction) {
            Some(rest) => rest,
            None => return false,
        },
        None => rest,
    };
    rest.trim_start().eq_ignore_ascii_case(AREA_UNIT)
}

/// Strip one or more leading ASCII digits, or `None` if there are none.
fn strip_digits(s: &str) -> Option<&str> {
    let rest = s.trim_start_matches(|c: char| c.is_ascii_digit());
    (rest.len() < s.len()).then_some(rest)
}
