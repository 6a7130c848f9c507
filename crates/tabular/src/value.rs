#![forbid(unsafe_code)]

use ct_core::clamp_score;

pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Case-insensitive; anything other than "yes" reads false.
pub fn parse_yes_no(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}

/// Scores print as minimal decimal text: `7` rather than `7.0`, `7.5` as is.
pub fn score_text(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Blank or unparsable score cells read as 0.
pub fn parse_score(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .map(clamp_score)
        .unwrap_or(0.0)
}
