pub mod filtering;
pub mod grouping;
pub mod sorting;

pub use filtering::{filter, PropertyFilter};
pub use grouping::{group_by, GroupKey, UNCATEGORIZED};
pub use sorting::{sort_by, SortBy};

/// Parse a display price such as "€1,200" or "US$ 350.000-".
///
/// Everything except digits, '.' and '-' is dropped, then the longest
/// leading number is read ("350.000-" is 350, "10-20" is 10). No leading
/// number counts as 0.
pub fn parse_price(price: &str) -> f64 {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    leading_number(&cleaned)
}

/// Parse the leading number of a count field ("3", "2.5", "4+"); 0 otherwise
pub fn parse_count(value: &str) -> f64 {
    leading_number(value.trim())
}

/// Longest prefix of the form `-?digits[.digits]`, parsed; 0 when there is none
fn leading_number(value: &str) -> f64 {
    let mut seen_dot = false;
    let end = value
        .char_indices()
        .find(|&(i, c)| match c {
            '0'..='9' => false,
            '-' => i != 0,
            '.' if !seen_dot => {
                seen_dot = true;
                false
            }
            _ => true,
        })
        .map(|(i, _)| i)
        .unwrap_or(value.len());

    value[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .unwrap_or(0.0)
}
