//! Location-code splitting for large-type display.

use std::sync::LazyLock;

use regex::Regex;

static LETTERS_THEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("static regex is valid"));

/// How a location code is laid out in large type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitCode<'a> {
    /// Letters on the first line, digits on the second.
    Split {
        /// Leading letters, e.g. `"A"` of `"A123"`.
        letters: &'a str,
        /// Trailing digits, e.g. `"123"` of `"A123"`.
        digits: &'a str,
    },
    /// Anything else stays on one line.
    Whole(&'a str),
}

impl<'a> SplitCode<'a> {
    /// Display lines, top to bottom.
    pub fn lines(&self) -> Vec<&'a str> {
        match *self {
            SplitCode::Split { letters, digits } => vec![letters, digits],
            SplitCode::Whole(code) => vec![code],
        }
    }
}

/// Apply the split rule: a code made of letters followed by digits (and
/// nothing else) is shown on two lines. The code itself is not modified.
pub fn split_location_code(code: &str) -> SplitCode<'_> {
    match LETTERS_THEN_DIGITS.captures(code) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(letters), Some(digits)) => SplitCode::Split {
                letters: letters.as_str(),
                digits: digits.as_str(),
            },
            _ => SplitCode::Whole(code),
        },
        None => SplitCode::Whole(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_then_digits_split() {
        assert_eq!(
            split_location_code("A123"),
            SplitCode::Split {
                letters: "A",
                digits: "123"
            }
        );
        assert_eq!(split_location_code("AB07").lines(), vec!["AB", "07"]);
    }

    #[test]
    fn digits_then_letters_stay_whole() {
        assert_eq!(split_location_code("9Z"), SplitCode::Whole("9Z"));
        assert_eq!(split_location_code("9Z").lines(), vec!["9Z"]);
    }

    #[test]
    fn trailing_characters_stay_whole() {
        assert_eq!(split_location_code("A12B"), SplitCode::Whole("A12B"));
        assert_eq!(split_location_code("A-12"), SplitCode::Whole("A-12"));
    }

    #[test]
    fn letters_or_digits_only_stay_whole() {
        assert_eq!(split_location_code("ABC"), SplitCode::Whole("ABC"));
        assert_eq!(split_location_code("123"), SplitCode::Whole("123"));
        assert_eq!(split_location_code(""), SplitCode::Whole(""));
    }
}
