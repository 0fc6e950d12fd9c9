//! Coercion of loosely typed submitted fields.
//!
//! Forms submit everything as text while JSON clients send numbers, so numeric
//! fields accept either and are converted here.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::ValidationError;

/// A field that may arrive as a JSON number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
}

impl FieldValue {
    /// The textual form of the value, or [None] if it is blank
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Number(n) => Some(number_text(n)),
            Self::Text(t) if t.trim().is_empty() => None,
            Self::Text(t) => Some(t.trim().to_string()),
        }
    }

    fn as_f64(&self, field: &'static str) -> Result<f64, ValidationError> {
        let number = match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(t) => t.trim().parse::<f64>().ok(),
        };

        number
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.invalid(field))
    }

    fn as_count(&self, field: &'static str) -> Result<u32, ValidationError> {
        let number = self.as_f64(field)?;

        if number.fract() != 0. || number < 0. || number > f64::from(u32::MAX) {
            return Err(self.invalid(field));
        }

        Ok(number as u32)
    }

    fn invalid(&self, field: &'static str) -> ValidationError {
        let value = match self {
            Self::Number(n) => n.to_string(),
            Self::Text(t) => t.clone(),
        };

        ValidationError::InvalidNumber { field, value }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or_else(|| Self::Text(value.to_string()))
    }
}

/// Whole floats such as `7.0` are written as integers, so they name the same record as `7`
fn number_text(number: &Number) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.;

    match number.as_f64() {
        Some(n) if number.is_f64() && n.fract() == 0. && n.abs() <= MAX_EXACT => {
            format!("{}", n as i64)
        }
        _ => number.to_string(),
    }
}

/// Requires a non-blank text field
pub fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    optional_text(field, value)?.ok_or(ValidationError::MissingField(field))
}

/// Allows an absent field, but not a blank one
pub fn optional_text(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ValidationError::MissingField(field)),
        v => Ok(v),
    }
}

/// Requires an identifier, given as a number or text
pub fn required_id(field: &'static str, value: Option<FieldValue>) -> Result<String, ValidationError> {
    value
        .as_ref()
        .and_then(FieldValue::as_text)
        .ok_or(ValidationError::MissingField(field))
}

/// Coerces a price, which must be above zero
pub fn price(field: &'static str, value: &FieldValue) -> Result<f64, ValidationError> {
    let price = value.as_f64(field)?;

    if price <= 0. {
        return Err(ValidationError::NotPositive(field));
    }

    Ok(price)
}

/// Coerces a count such as a number of bedrooms
pub fn count(field: &'static str, value: &FieldValue) -> Result<u32, ValidationError> {
    value.as_count(field)
}

/// Blank text counts as absent
pub fn non_blank(value: Option<FieldValue>) -> Option<FieldValue> {
    value.filter(|v| v.as_text().is_some())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numbers_are_coerced_from_text() {
        assert_eq!(price("price", &"1200.50".into()), Ok(1200.5));
        assert_eq!(price("price", &FieldValue::from(950.)), Ok(950.));
        assert_eq!(count("beds", &" 3 ".into()), Ok(3));
        assert_eq!(count("beds", &FieldValue::from(0)), Ok(0));
        assert_eq!(count("baths", &"2.0".into()), Ok(2));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert_eq!(
            price("price", &"cheap".into()),
            Err(ValidationError::InvalidNumber {
                field: "price",
                value: "cheap".to_string()
            })
        );
        assert_eq!(
            price("price", &"-5".into()),
            Err(ValidationError::NotPositive("price"))
        );
        assert!(count("beds", &"2.5".into()).is_err());
        assert!(count("beds", &"-1".into()).is_err());
    }

    #[test]
    fn identifiers_accept_numbers_and_text() {
        let from_number: FieldValue = serde_json::from_str("42").unwrap();
        let from_text: FieldValue = serde_json::from_str("\"42\"").unwrap();

        assert_eq!(required_id("id", Some(from_number)), Ok("42".to_string()));
        assert_eq!(required_id("id", Some(from_text)), Ok("42".to_string()));
        assert_eq!(
            required_id("id", Some("  ".into())),
            Err(ValidationError::MissingField("id"))
        );
        assert_eq!(required_id("id", None), Err(ValidationError::MissingField("id")));
    }

    #[test]
    fn whole_float_identifiers_match_integers() {
        let whole: FieldValue = serde_json::from_str("7.0").unwrap();
        let fractional: FieldValue = serde_json::from_str("7.5").unwrap();

        assert_eq!(required_id("id", Some(whole)), Ok("7".to_string()));
        assert_eq!(FieldValue::from(-12.).as_text(), Some("-12".to_string()));
        assert_eq!(fractional.as_text(), Some("7.5".to_string()));
        assert_eq!(FieldValue::from(1e300).as_text(), Some("1e300".to_string()));
    }

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(
            required_text("title", Some(" ".to_string())),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(optional_text("city", None), Ok(None));
        assert_eq!(
            optional_text("city", Some("Austin".to_string())),
            Ok(Some("Austin".to_string()))
        );
    }
}
