//! Request validation
//!
//! Turns raw form fields or an untyped JSON payload into a
//! [`PredictionRequest`]. Parse failures and range failures are both
//! reported as [`PricingError::InvalidInput`] with a descriptive message.

use crate::error::{PricingError, PricingResult};
use crate::models::PredictionRequest;
use chrono::{Datelike, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Earliest accepted manufacturing year
pub const MIN_YEAR: i64 = 1900;

/// Fields every prediction request must carry
pub const REQUIRED_FIELDS: [&str; 3] = ["year", "km_driven", "ex_showroom_price"];

/// Form values that switch heuristic adjustments on
const FORM_TRUE_VALUES: [&str; 4] = ["on", "true", "1", "yes"];

/// Validates incoming requests against a fixed "current year"
#[derive(Debug, Clone, Copy)]
pub struct InputValidator {
    current_year: i32,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl InputValidator {
    /// Validator pinned to the current UTC calendar year
    pub fn new() -> Self {
        Self::with_current_year(Utc::now().year())
    }

    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Validate fields submitted through the HTML form
    pub fn from_form(&self, fields: &HashMap<String, String>) -> PricingResult<PredictionRequest> {
        let year = parse_int("year", required(fields, "year")?)?;
        let km_driven = parse_float("km_driven", required(fields, "km_driven")?)?;
        let ex_showroom_price =
            parse_float("ex_showroom_price", required(fields, "ex_showroom_price")?)?;
        let year = self.check_ranges(year, km_driven, ex_showroom_price)?;

        let optional = |name: &str| fields.get(name).and_then(|v| non_empty(v));
        let apply_adjustments = fields
            .get("apply_adjustments")
            .map_or(false, |v| is_form_toggle_on(v));

        Ok(PredictionRequest {
            year,
            km_driven,
            ex_showroom_price,
            owner: optional("owner"),
            seller_type: optional("seller_type"),
            model_name: optional("model_name"),
            apply_adjustments,
        })
    }

    /// Validate a JSON payload from the prediction API
    pub fn from_json(&self, payload: &Value) -> PricingResult<PredictionRequest> {
        if !is_truthy(payload) {
            return Err(PricingError::invalid("No JSON payload provided"));
        }
        let data = match payload {
            Value::Object(map) => map,
            _ => return Err(PricingError::invalid("JSON payload must be an object")),
        };

        let missing = missing_fields(data);
        if !missing.is_empty() {
            return Err(PricingError::invalid(format!("Missing fields: {:?}", missing)));
        }

        let year = json_int("year", &data["year"])?;
        let km_driven = json_float("km_driven", &data["km_driven"])?;
        let ex_showroom_price = json_float("ex_showroom_price", &data["ex_showroom_price"])?;
        let year = self.check_ranges(year, km_driven, ex_showroom_price)?;

        Ok(PredictionRequest {
            year,
            km_driven,
            ex_showroom_price,
            owner: json_optional_string("owner", data.get("owner"))?,
            seller_type: json_optional_string("seller_type", data.get("seller_type"))?,
            model_name: json_optional_string("model_name", data.get("model_name"))?,
            apply_adjustments: data.get("apply_adjustments").map(is_truthy).unwrap_or(false),
        })
    }

    fn check_ranges(&self, year: i64, km_driven: f64, ex_showroom_price: f64) -> PricingResult<i32> {
        if year < MIN_YEAR || year > i64::from(self.current_year) {
            return Err(PricingError::invalid("year out of range"));
        }
        if km_driven < 0.0 {
            return Err(PricingError::invalid("km_driven negative"));
        }
        if ex_showroom_price <= 0.0 {
            return Err(PricingError::invalid("price non-positive"));
        }
        // bounded by current_year above
        Ok(year as i32)
    }
}

/// Required keys absent from a JSON payload, in declaration order
pub fn missing_fields(data: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|name| !data.contains_key(*name))
        .collect()
}

fn required<'a>(fields: &'a HashMap<String, String>, name: &str) -> PricingResult<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| PricingError::invalid(format!("missing field: {}", name)))
}

/// Empty strings count as absent; anything else is kept verbatim
fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_int(field: &str, raw: &str) -> PricingResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| PricingError::invalid(format!("invalid {}: {}", field, e)))
}

fn parse_float(field: &str, raw: &str) -> PricingResult<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| PricingError::invalid(format!("invalid {}: {}", field, e)))?;
    finite(field, value)
}

fn finite(field: &str, value: f64) -> PricingResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::invalid(format!("invalid {}: not a finite number", field)))
    }
}

fn json_int(field: &str, value: &Value) -> PricingResult<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i),
            None => {
                let f = finite(field, n.as_f64().unwrap_or(f64::NAN))?;
                Ok(f.trunc() as i64)
            }
        },
        Value::String(s) => parse_int(field, s),
        other => Err(type_error(field, other)),
    }
}

fn json_float(field: &str, value: &Value) -> PricingResult<f64> {
    match value {
        Value::Number(n) => finite(field, n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => parse_float(field, s),
        other => Err(type_error(field, other)),
    }
}

fn json_optional_string(field: &str, value: Option<&Value>) -> PricingResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(non_empty(s)),
        Some(_) => Err(PricingError::invalid(format!("{} must be a string", field))),
    }
}

fn type_error(field: &str, value: &Value) -> PricingError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    PricingError::invalid(format!("invalid {}: expected a number, got {}", field, kind))
}

/// Whether a submitted checkbox value switches adjustments on
pub fn is_form_toggle_on(value: &str) -> bool {
    FORM_TRUE_VALUES.contains(&value.trim().to_ascii_lowercase().as_str())
}

/// Truthiness of an arbitrary JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> InputValidator {
        InputValidator::with_current_year(2024)
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("year", "2018"),
            ("km_driven", "15000"),
            ("ex_showroom_price", "85000"),
        ]
    }

    fn message(err: PricingError) -> String {
        match err {
            PricingError::InvalidInput(msg) => msg,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_form_minimal_request() {
        let request = validator().from_form(&form(&base_form())).unwrap();
        assert_eq!(request.year, 2018);
        assert_eq!(request.km_driven, 15000.0);
        assert_eq!(request.ex_showroom_price, 85000.0);
        assert_eq!(request.owner, None);
        assert!(!request.apply_adjustments);
    }

    #[test]
    fn test_form_optional_fields_and_toggle() {
        let mut fields = base_form();
        fields.extend([
            ("owner", "1st owner"),
            ("seller_type", ""),
            ("model_name", "Honda Shine"),
            ("apply_adjustments", "on"),
        ]);
        let request = validator().from_form(&form(&fields)).unwrap();
        assert_eq!(request.owner.as_deref(), Some("1st owner"));
        assert_eq!(request.seller_type, None);
        assert_eq!(request.model_name.as_deref(), Some("Honda Shine"));
        assert!(request.apply_adjustments);
    }

    #[test]
    fn test_optional_strings_kept_verbatim() {
        let mut fields = base_form();
        fields.extend([("owner", "  1st owner "), ("seller_type", "   ")]);
        let request = validator().from_form(&form(&fields)).unwrap();
        assert_eq!(request.owner.as_deref(), Some("  1st owner "));
        assert_eq!(request.seller_type.as_deref(), Some("   "));

        let payload = json!({
            "year": 2018, "km_driven": 1, "ex_showroom_price": 1,
            "owner": " ", "model_name": ""
        });
        let request = validator().from_json(&payload).unwrap();
        assert_eq!(request.owner.as_deref(), Some(" "));
        assert_eq!(request.model_name, None);
    }

    #[test]
    fn test_form_toggle_values() {
        for (raw, expected) in [("on", true), ("TRUE", true), ("1", true), ("off", false), ("", false)] {
            let mut fields = base_form();
            fields.push(("apply_adjustments", raw));
            let request = validator().from_form(&form(&fields)).unwrap();
            assert_eq!(request.apply_adjustments, expected, "value {:?}", raw);
        }
    }

    #[test]
    fn test_range_rejections() {
        let cases = [
            ("year", "1899", "year out of range"),
            ("year", "2025", "year out of range"),
            ("km_driven", "-1", "km_driven negative"),
            ("ex_showroom_price", "0", "price non-positive"),
            ("ex_showroom_price", "-5", "price non-positive"),
        ];
        for (name, raw, expected) in cases {
            let fields: Vec<_> = base_form()
                .into_iter()
                .map(|(k, v)| if k == name { (k, raw) } else { (k, v) })
                .collect();
            let err = validator().from_form(&form(&fields)).unwrap_err();
            assert_eq!(message(err), expected);
        }
    }

    #[test]
    fn test_range_bounds_inclusive() {
        for year in ["1900", "2024"] {
            let fields: Vec<_> = base_form()
                .into_iter()
                .map(|(k, v)| if k == "year" { (k, year) } else { (k, v) })
                .collect();
            assert!(validator().from_form(&form(&fields)).is_ok());
        }
        let fields: Vec<_> = base_form()
            .into_iter()
            .map(|(k, v)| if k == "km_driven" { (k, "0") } else { (k, v) })
            .collect();
        assert!(validator().from_form(&form(&fields)).is_ok());
    }

    #[test]
    fn test_form_parse_failures() {
        let fields = form(&[("year", "abc"), ("km_driven", "1"), ("ex_showroom_price", "1")]);
        assert!(message(validator().from_form(&fields).unwrap_err()).starts_with("invalid year"));

        let fields = form(&[("year", "2018"), ("km_driven", "NaN"), ("ex_showroom_price", "1")]);
        assert!(message(validator().from_form(&fields).unwrap_err()).starts_with("invalid km_driven"));

        let fields = form(&[("year", "2018"), ("km_driven", "1")]);
        assert_eq!(
            message(validator().from_form(&fields).unwrap_err()),
            "missing field: ex_showroom_price"
        );
    }

    #[test]
    fn test_json_request() {
        let payload = json!({
            "year": 2018,
            "km_driven": "15000",
            "ex_showroom_price": 85000.5,
            "owner": "1st owner",
            "model_name": null,
            "apply_adjustments": true
        });
        let request = validator().from_json(&payload).unwrap();
        assert_eq!(request.year, 2018);
        assert_eq!(request.km_driven, 15000.0);
        assert_eq!(request.ex_showroom_price, 85000.5);
        assert_eq!(request.owner.as_deref(), Some("1st owner"));
        assert_eq!(request.model_name, None);
        assert!(request.apply_adjustments);
    }

    #[test]
    fn test_json_missing_fields_named() {
        let err = validator().from_json(&json!({"year": 2018})).unwrap_err();
        assert_eq!(message(err), r#"Missing fields: ["km_driven", "ex_showroom_price"]"#);
    }

    #[test]
    fn test_json_empty_payload() {
        for payload in [json!(null), json!({}), json!(false), json!(0), json!(""), json!([])] {
            let err = validator().from_json(&payload).unwrap_err();
            assert_eq!(message(err), "No JSON payload provided", "payload {}", payload);
        }
        for payload in [json!([1, 2]), json!("text"), json!(7)] {
            let err = validator().from_json(&payload).unwrap_err();
            assert_eq!(message(err), "JSON payload must be an object", "payload {}", payload);
        }
    }

    #[test]
    fn test_json_type_errors() {
        let payload = json!({"year": true, "km_driven": 1, "ex_showroom_price": 1});
        assert!(message(validator().from_json(&payload).unwrap_err()).contains("expected a number"));

        let payload = json!({"year": 2018, "km_driven": 1, "ex_showroom_price": 1, "owner": 3});
        assert_eq!(
            message(validator().from_json(&payload).unwrap_err()),
            "owner must be a string"
        );
    }

    #[test]
    fn test_json_float_year_truncates() {
        let payload = json!({"year": 2018.7, "km_driven": 1, "ex_showroom_price": 1});
        assert_eq!(validator().from_json(&payload).unwrap().year, 2018);
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(1), json!("no"), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }
}
