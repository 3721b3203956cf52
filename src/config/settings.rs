//! Display settings used when rendering property values as text
//!
//! These settings control the canonical display strings produced by the
//! property model: boolean labels, separators used by flag and list
//! properties, and locale-style number formatting for floating-point leaves.
//!
//! # Main Types
//!
//! - [`DisplaySettings`] - Labels, separators and default precision
//! - [`NumberFormat`] - Decimal and digit-group separators

use serde::{Deserialize, Serialize};

/// Default number of decimals for float properties without a `decimals` attribute
pub const DEFAULT_DECIMALS: u32 = 2;

/// Text rendering options for property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Label shown for `true`
    pub true_label: String,

    /// Label shown for `false`
    pub false_label: String,

    /// Separator between the names of set flag bits
    pub flag_separator: String,

    /// Separator between list items
    pub list_separator: String,

    /// Decimals used when a float property has no usable `decimals` attribute
    pub default_decimals: u32,

    /// Locale-style number formatting
    pub number_format: NumberFormat,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            true_label: "True".to_string(),
            false_label: "False".to_string(),
            flag_separator: " | ".to_string(),
            list_separator: ", ".to_string(),
            default_decimals: DEFAULT_DECIMALS,
            number_format: NumberFormat::default(),
        }
    }
}

impl DisplaySettings {
    pub fn bool_label(&self, value: bool) -> &str {
        if value {
            &self.true_label
        } else {
            &self.false_label
        }
    }
}

/// Decimal and digit-group separators for fixed-point output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Character between the integer and fractional parts
    pub decimal_separator: char,

    /// Optional character inserted every three integer digits
    pub group_separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: None,
        }
    }
}

impl NumberFormat {
    /// Format `value` with exactly `decimals` fractional digits.
    pub fn format_fixed(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let text = format!("{:.*}", decimals, value);
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let (integer, fraction) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };

        let mut out = String::with_capacity(text.len() + integer.len() / 3);
        out.push_str(sign);
        out.push_str(&self.group_digits(integer));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }

    /// Format `value` with at most `digits` significant digits, dropping
    /// trailing zeros. Very large or small magnitudes use exponent form,
    /// e.g. `1.23457e+06`.
    pub fn format_significant(&self, value: f64, digits: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        if value == 0.0 {
            return "0".to_string();
        }
        let digits = digits.max(1);
        let scientific = format!("{:.*e}", digits - 1, value);
        let Some((mantissa, exponent)) = scientific.split_once('e') else {
            return scientific;
        };
        let exponent: i32 = exponent.parse().unwrap_or(0);

        if exponent < -4 || exponent >= digits as i32 {
            let mantissa = self.localize(trim_fraction(mantissa));
            let sign = if exponent < 0 { '-' } else { '+' };
            return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
        }
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        self.localize(trim_fraction(&fixed))
    }

    fn localize(&self, text: &str) -> String {
        text.replace('.', &self.decimal_separator.to_string())
    }

    fn group_digits(&self, integer: &str) -> String {
        let Some(sep) = self.group_separator else {
            return integer.to_string();
        };
        let len = integer.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }
}

/// `1.500` -> `1.5`, `2.000` -> `2`
fn trim_fraction(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.')
}
