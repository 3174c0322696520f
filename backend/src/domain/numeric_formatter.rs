//! Amount formatting for the dashboard, bill lists and chart labels.
//!
//! All functions are total: non-finite input renders as zero instead of
//! failing.

use serde::{Deserialize, Serialize};

/// Amounts from here up are rendered with a unit suffix
const PLAIN_UPPER_LIMIT: f64 = 100_000.0;
/// Negative amounts from here down are rendered with a unit suffix
const PLAIN_LOWER_LIMIT: f64 = -1_000.0;
/// Chart labels closer than this to a whole number drop their decimals
const WHOLE_NUMBER_TOLERANCE: f64 = 0.01;

const UNITS: [(f64, &str); 4] = [
    (1_000_000_000_000.0, "T"),
    (1_000_000_000.0, "B"),
    (1_000_000.0, "M"),
    (1_000.0, "K"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormattingConfig {
    /// Thousands grouping separator
    pub grouping_separator: char,
    pub currency_symbol: String,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            grouping_separator: ',',
            currency_symbol: "$".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumericFormatter {
    config: FormattingConfig,
}

impl NumericFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormattingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormattingConfig {
        &self.config
    }

    /// `1234567` → `"1,234,567"`, `-42` → `"-42"`
    pub fn format_with_commas(&self, value: i64) -> String {
        let grouped = self.group_digits(&value.unsigned_abs().to_string());
        if value < 0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    /// Short form of an amount for cards and list rows.
    ///
    /// Amounts that round into `(-1,000, 100,000)` are grouped
    /// (`15243.7` → `"15,244"`). Anything else is divided by the largest
    /// K/M/B/T unit it clears and truncated to four significant digits, or
    /// three when the integer part has two digits: `1234567` → `"1.234M"`,
    /// `-2500` → `"-2.5K"`.
    pub fn format_compact(&self, value: f64) -> String {
        if !value.is_finite() {
            return "0".to_string();
        }

        let rounded = value.round();
        if rounded > PLAIN_LOWER_LIMIT && rounded < PLAIN_UPPER_LIMIT {
            return self.format_with_commas(rounded as i64);
        }

        // values that only leave the plain range by rounding use the rounded amount
        let value = if value > PLAIN_LOWER_LIMIT && value < PLAIN_UPPER_LIMIT {
            rounded
        } else {
            value
        };
        let magnitude = value.abs();
        let (divisor, suffix) = UNITS
            .iter()
            .copied()
            .find(|(threshold, _)| magnitude >= *threshold)
            .unwrap_or((1.0, ""));

        let scaled = magnitude / divisor;
        let integer_digits = integer_digit_count(scaled);
        let significant_digits: usize = if integer_digits == 2 { 3 } else { 4 };
        let decimals = significant_digits.saturating_sub(integer_digits);

        let text = strip_trailing_zeros(format!("{:.*}", decimals, truncate_decimals(scaled, decimals)));
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}{}{}", sign, text, suffix)
    }

    /// Group `value` rendered with a fixed number of decimals
    pub fn format_grouped(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return self.format_grouped(0.0, decimals);
        }

        let rendered = format!("{:.*}", decimals, value.abs());
        let (integer_part, fraction_part) = match rendered.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (rendered.as_str(), None),
        };

        let mut text = self.group_digits(integer_part);
        if let Some(fraction) = fraction_part {
            text.push('.');
            text.push_str(fraction);
        }

        let is_zero = !rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
        if value < 0.0 && !is_zero {
            format!("-{}", text)
        } else {
            text
        }
    }

    /// Chart axis label: no decimals for (near) whole numbers, two otherwise
    pub fn format_axis_value(&self, value: f64) -> String {
        if (value - value.round()).abs() < WHOLE_NUMBER_TOLERANCE {
            self.format_grouped(value.round(), 0)
        } else {
            self.format_grouped(value, 2)
        }
    }

    /// `-5.0` → `"-$5.00"`, `1234.5` → `"$1,234.50"`
    pub fn format_currency(&self, value: f64) -> String {
        let grouped = self.format_grouped(value.abs(), 2);
        let is_zero = !grouped.chars().any(|c| c.is_ascii_digit() && c != '0');
        if value < 0.0 && !is_zero {
            format!("-{}{}", self.config.currency_symbol, grouped)
        } else {
            format!("{}{}", self.config.currency_symbol, grouped)
        }
    }

    fn group_digits(&self, digits: &str) -> String {
        let separator = self.config.grouping_separator;
        let count = digits.chars().count();
        let mut grouped = String::with_capacity(digits.len() + count / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (count - i) % 3 == 0 {
                grouped.push(separator);
            }
            grouped.push(c);
        }
        grouped
    }
}

/// English ordinal for a day of month: `1st`, `2nd`, `3rd`, `11th`, `21st`
pub fn day_ordinal(day: u32) -> String {
    let suffix = match (day % 100, day % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

fn integer_digit_count(value: f64) -> usize {
    let integer = value.trunc();
    if integer < 1.0 {
        1
    } else {
        format!("{:.0}", integer).len()
    }
}

fn truncate_decimals(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let shifted = value * factor;
    // absorb representation error such as 4.56 * 100 = 455.99999999999994
    let nudged = shifted + shifted.abs() * 1e-12;
    nudged.trunc() / factor
}

fn strip_trailing_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> NumericFormatter {
        NumericFormatter::new()
    }

    #[test]
    fn test_format_with_commas() {
        let f = formatter();
        assert_eq!(f.format_with_commas(1_234_567), "1,234,567");
        assert_eq!(f.format_with_commas(-42), "-42");
        assert_eq!(f.format_with_commas(0), "0");
        assert_eq!(f.format_with_commas(999), "999");
        assert_eq!(f.format_with_commas(1_000), "1,000");
        assert_eq!(f.format_with_commas(-1_234_567), "-1,234,567");
        assert_eq!(f.format_with_commas(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_format_with_custom_separator() {
        let f = NumericFormatter::with_config(FormattingConfig {
            grouping_separator: '.',
            ..FormattingConfig::default()
        });
        assert_eq!(f.format_with_commas(1_234_567), "1.234.567");
    }

    #[test]
    fn test_format_compact_plain_range() {
        let f = formatter();
        assert_eq!(f.format_compact(15_243.7), "15,244");
        assert_eq!(f.format_compact(15_200.0), "15,200");
        assert_eq!(f.format_compact(0.0), "0");
        assert_eq!(f.format_compact(-42.4), "-42");
        assert_eq!(f.format_compact(99_999.4), "99,999");
    }

    #[test]
    fn test_format_compact_units() {
        let f = formatter();
        assert_eq!(f.format_compact(1_500_000.0), "1.5M");
        assert_eq!(f.format_compact(123_456.0), "123.4K");
        assert_eq!(f.format_compact(45_600_000.0), "45.6M");
        assert_eq!(f.format_compact(2_000_000_000.0), "2B");
        assert_eq!(f.format_compact(3_250_000_000_000.0), "3.25T");
        assert_eq!(f.format_compact(100_000.0), "100K");
    }

    #[test]
    fn test_format_compact_truncates() {
        let f = formatter();
        assert_eq!(f.format_compact(1_234_567.0), "1.234M");
        assert_eq!(f.format_compact(999_999.0), "999.9K");
        assert_eq!(f.format_compact(12_999_999.0), "12.9M");
    }

    #[test]
    fn test_format_compact_negative() {
        let f = formatter();
        let text = f.format_compact(-2_500.0);
        assert!(text.starts_with('-'));
        assert!(text.ends_with('K'));
        assert_eq!(text, "-2.5K");
        assert_eq!(f.format_compact(-1_500_000.0), "-1.5M");
    }

    #[test]
    fn test_format_compact_rounding_across_boundary() {
        let f = formatter();
        assert_eq!(f.format_compact(-999.6), f.format_compact(-1_000.0));
        assert_eq!(f.format_compact(-999.6), "-1K");
        assert_eq!(f.format_compact(-999.4), "-999");
        assert_eq!(f.format_compact(99_999.6), f.format_compact(100_000.0));
        assert_eq!(f.format_compact(99_999.6), "100K");
    }

    #[test]
    fn test_format_compact_non_finite() {
        let f = formatter();
        assert_eq!(f.format_compact(f64::NAN), "0");
        assert_eq!(f.format_compact(f64::INFINITY), "0");
    }

    #[test]
    fn test_format_axis_value() {
        let f = formatter();
        assert_eq!(f.format_axis_value(1_200.0), "1,200");
        assert_eq!(f.format_axis_value(1_199.995), "1,200");
        assert_eq!(f.format_axis_value(1_234.5), "1,234.50");
        assert_eq!(f.format_axis_value(-0.001), "0");
        assert_eq!(f.format_axis_value(-250.25), "-250.25");
    }

    #[test]
    fn test_format_currency() {
        let f = formatter();
        assert_eq!(f.format_currency(1_234.5), "$1,234.50");
        assert_eq!(f.format_currency(-5.0), "-$5.00");
        assert_eq!(f.format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_day_ordinal() {
        assert_eq!(day_ordinal(1), "1st");
        assert_eq!(day_ordinal(2), "2nd");
        assert_eq!(day_ordinal(3), "3rd");
        assert_eq!(day_ordinal(4), "4th");
        assert_eq!(day_ordinal(11), "11th");
        assert_eq!(day_ordinal(12), "12th");
        assert_eq!(day_ordinal(13), "13th");
        assert_eq!(day_ordinal(21), "21st");
        assert_eq!(day_ordinal(22), "22nd");
        assert_eq!(day_ordinal(23), "23rd");
        assert_eq!(day_ordinal(31), "31st");
    }
}
