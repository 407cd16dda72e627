//! Explicit payload schemas.
//!
//! Every request body is checked field by field against a hand-written schema so that
//! only the listed fields ever reach the store. Errors accumulate per field, in the same
//! shape clients receive in a 400 response.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

/// Key used for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "This field may not be null.";
pub const BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_A_NUMBER: &str = "A valid number is required.";
pub const NOT_AN_INTEGER: &str = "A valid integer is required.";

/// Decimal columns are `NUMERIC(10, 2)`.
pub const AMOUNT_MAX_DIGITS: u32 = 10;
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Per-field validation failures, serialized as `{field: [reason, ...]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, reason);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Finish a validation pass: `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A request schema that can be built from a raw JSON object.
pub trait Validate: Sized {
    fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationErrors>;
}

/// Required string field, `1..=max_chars` characters.
pub fn required_text(
    payload: &Map<String, Value>,
    field: &str,
    max_chars: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match payload.get(field) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(value) => text(value, field, max_chars, false, errors),
    }
}

/// Optional string field; `null` and absent are both treated as unset, blank is allowed.
pub fn optional_text(
    payload: &Map<String, Value>,
    field: &str,
    max_chars: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match payload.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => text(value, field, max_chars, true, errors).filter(|s| !s.is_empty()),
    }
}

fn text(
    value: &Value,
    field: &str,
    max_chars: usize,
    allow_blank: bool,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        // Scalars are coerced to their string form; containers are rejected.
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => {
            errors.add(field, NULL);
            return None;
        }
        Value::Array(_) | Value::Object(_) => {
            errors.add(field, NOT_A_STRING);
            return None;
        }
    };

    // Surrounding whitespace is never stored and never counts toward the limit
    let s = s.trim().to_string();

    let mut ok = true;
    if !allow_blank && s.is_empty() {
        errors.add(field, BLANK);
        ok = false;
    }
    if s.chars().count() > max_chars {
        errors.add(field, format!("Ensure this field has no more than {} characters.", max_chars));
        ok = false;
    }
    ok.then_some(s)
}

/// Required string kept exactly as sent. Used for passwords, where whitespace is significant.
pub fn required_secret(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match payload.get(field) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(Value::Null) => {
            errors.add(field, NULL);
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add(field, NOT_A_STRING);
            None
        }
    }
}

/// Required `NUMERIC(10, 2)` amount, given as a JSON string or number.
///
/// The returned value is non-negative and rescaled to exactly two decimal places.
pub fn required_amount(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<Decimal> {
    let raw = match payload.get(field) {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NULL);
            return None;
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add(field, NOT_A_NUMBER);
            return None;
        }
    };

    match parse_amount(&raw) {
        Ok(amount) => Some(amount),
        Err(reasons) => {
            for reason in reasons {
                errors.add(field, reason);
            }
            None
        }
    }
}

/// Parse and range-check a decimal amount.
pub fn parse_amount(raw: &str) -> Result<Decimal, Vec<String>> {
    if raw.is_empty() || raw.contains('_') {
        return Err(vec![NOT_A_NUMBER.to_string()]);
    }
    // serde_json prints large and tiny floats in exponent form (`1e20`, `1e-7`)
    let mut amount = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| vec![NOT_A_NUMBER.to_string()])?;

    let mut reasons = Vec::new();
    let whole_digits = AMOUNT_MAX_DIGITS - AMOUNT_DECIMAL_PLACES;
    if amount.scale() > AMOUNT_DECIMAL_PLACES {
        reasons.push(format!(
            "Ensure that there are no more than {} decimal places.",
            AMOUNT_DECIMAL_PLACES
        ));
    }
    if amount.trunc().abs() >= Decimal::from(10_i64.pow(whole_digits)) {
        reasons.push(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            whole_digits
        ));
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        reasons.push("Ensure this value is greater than or equal to 0.".to_string());
    }

    if !reasons.is_empty() {
        return Err(reasons);
    }

    amount.rescale(AMOUNT_DECIMAL_PLACES);
    // "-0.00" parses as negative zero
    amount.set_sign_positive(true);
    Ok(amount)
}

/// Optional integer field with a lower bound; absent or `null` yields `default`.
pub fn optional_int_at_least(
    payload: &Map<String, Value>,
    field: &str,
    min: i32,
    default: i32,
    errors: &mut ValidationErrors,
) -> Option<i32> {
    let value = match payload.get(field) {
        None | Some(Value::Null) => return Some(default),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match value.and_then(|v| i32::try_from(v).ok()) {
        Some(v) if v >= min => Some(v),
        Some(_) => {
            errors.add(field, format!("Ensure this value is greater than or equal to {}.", min));
            None
        }
        None => {
            errors.add(field, NOT_AN_INTEGER);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn amount_accepts_strings_and_numbers() {
        assert_eq!(parse_amount("12.5").unwrap().to_string(), "12.50");
        assert_eq!(parse_amount("0").unwrap().to_string(), "0.00");
        assert_eq!(parse_amount("-0.00").unwrap().to_string(), "0.00");
        assert_eq!(parse_amount("99999999.99").unwrap().to_string(), "99999999.99");

        let mut errors = ValidationErrors::new();
        let amount = required_amount(&object(json!({"amount": 7.25})), "amount", &mut errors);
        assert_eq!(amount.unwrap().to_string(), "7.25");
        assert!(errors.is_empty());
    }

    #[test]
    fn amount_rejects_malformed_values() {
        assert_eq!(parse_amount("abc").unwrap_err(), vec![NOT_A_NUMBER.to_string()]);
        assert_eq!(parse_amount("").unwrap_err(), vec![NOT_A_NUMBER.to_string()]);
        assert_eq!(
            parse_amount("1.234").unwrap_err(),
            vec!["Ensure that there are no more than 2 decimal places.".to_string()]
        );
        assert_eq!(
            parse_amount("100000000").unwrap_err(),
            vec!["Ensure that there are no more than 8 digits before the decimal point.".to_string()]
        );
        assert_eq!(
            parse_amount("-5").unwrap_err(),
            vec!["Ensure this value is greater than or equal to 0.".to_string()]
        );
    }

    #[test]
    fn amount_in_exponent_form_gets_range_messages() {
        assert_eq!(
            parse_amount("1e9").unwrap_err(),
            vec!["Ensure that there are no more than 8 digits before the decimal point.".to_string()]
        );
        assert_eq!(
            parse_amount("1e-7").unwrap_err(),
            vec!["Ensure that there are no more than 2 decimal places.".to_string()]
        );
        assert_eq!(parse_amount("2.5e1").unwrap().to_string(), "25.00");

        let mut errors = ValidationErrors::new();
        assert!(required_amount(&object(json!({"amount": 1e-7})), "amount", &mut errors).is_none());
        assert_eq!(
            errors.get("amount"),
            Some(&["Ensure that there are no more than 2 decimal places.".to_string()][..])
        );
    }

    #[test]
    fn amount_reports_missing_and_wrong_type() {
        let mut errors = ValidationErrors::new();
        assert!(required_amount(&object(json!({})), "amount", &mut errors).is_none());
        assert!(required_amount(&object(json!({"price": [1]})), "price", &mut errors).is_none());
        assert_eq!(errors.get("amount"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("price"), Some(&[NOT_A_NUMBER.to_string()][..]));
    }

    #[test]
    fn text_enforces_blank_and_length() {
        let mut errors = ValidationErrors::new();
        let payload = object(json!({"data": "", "long": "x".repeat(256), "ok": "x".repeat(255)}));

        assert!(required_text(&payload, "data", 255, &mut errors).is_none());
        assert!(required_text(&payload, "long", 255, &mut errors).is_none());
        assert_eq!(required_text(&payload, "ok", 255, &mut errors).map(|s| s.len()), Some(255));
        assert!(required_text(&payload, "missing", 255, &mut errors).is_none());

        assert_eq!(errors.get("data"), Some(&[BLANK.to_string()][..]));
        assert_eq!(
            errors.get("long"),
            Some(&["Ensure this field has no more than 255 characters.".to_string()][..])
        );
        assert_eq!(errors.get("missing"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.get("ok").is_none());
    }

    #[test]
    fn text_is_trimmed_before_length_check() {
        let mut errors = ValidationErrors::new();
        let padded = format!("  {}  ", "x".repeat(255));
        let payload = object(json!({"data": "  buy food  ", "padded": padded, "spaces": "   "}));

        assert_eq!(required_text(&payload, "data", 255, &mut errors).as_deref(), Some("buy food"));
        assert_eq!(required_text(&payload, "padded", 255, &mut errors).map(|s| s.len()), Some(255));
        assert!(required_text(&payload, "spaces", 255, &mut errors).is_none());
        assert_eq!(errors.get("spaces"), Some(&[BLANK.to_string()][..]));
        assert!(errors.get("padded").is_none());
    }

    #[test]
    fn secrets_keep_their_whitespace() {
        let mut errors = ValidationErrors::new();
        let payload = object(json!({"password": " p@ss ", "blank": "  ", "number": 12}));

        assert_eq!(required_secret(&payload, "password", &mut errors).as_deref(), Some(" p@ss "));
        assert!(required_secret(&payload, "blank", &mut errors).is_none());
        assert!(required_secret(&payload, "number", &mut errors).is_none());
        assert!(required_secret(&payload, "missing", &mut errors).is_none());
        assert_eq!(errors.get("blank"), Some(&[BLANK.to_string()][..]));
        assert_eq!(errors.get("number"), Some(&[NOT_A_STRING.to_string()][..]));
        assert_eq!(errors.get("missing"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn text_length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        let payload = object(json!({"data": "é".repeat(255)}));
        assert!(required_text(&payload, "data", 255, &mut errors).is_some());
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_text_treats_null_and_blank_as_unset() {
        let mut errors = ValidationErrors::new();
        let payload = object(json!({"a": null, "b": "", "c": "rice"}));
        assert_eq!(optional_text(&payload, "a", 10, &mut errors), None);
        assert_eq!(optional_text(&payload, "b", 10, &mut errors), None);
        assert_eq!(optional_text(&payload, "c", 10, &mut errors).as_deref(), Some("rice"));
        assert_eq!(optional_text(&payload, "d", 10, &mut errors), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_int_defaults_and_bounds() {
        let mut errors = ValidationErrors::new();
        let payload = object(json!({"zero": 0, "three": "3", "word": "many"}));
        assert_eq!(optional_int_at_least(&payload, "absent", 1, 1, &mut errors), Some(1));
        assert_eq!(optional_int_at_least(&payload, "three", 1, 1, &mut errors), Some(3));
        assert_eq!(optional_int_at_least(&payload, "zero", 1, 1, &mut errors), None);
        assert_eq!(optional_int_at_least(&payload, "word", 1, 1, &mut errors), None);
        assert_eq!(errors.get("word"), Some(&[NOT_AN_INTEGER.to_string()][..]));
        assert!(errors.get("zero").is_some());
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let mut errors = ValidationErrors::single("amount", REQUIRED);
        errors.add("amount", "second");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"amount": [REQUIRED, "second"]})
        );
        assert_eq!(errors.to_string(), "invalid fields: amount");
    }
}
