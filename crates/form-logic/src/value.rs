//! String coercion of runtime field values.
//!
//! Form state is loosely typed: a field may hold a string, a number, a list
//! of selected options, or nothing at all. Every comparison works on the
//! string form produced here.

use serde_json::Value;

/// Looks up a field in a snapshot object. `null` counts as absent.
pub fn lookup<'a>(snapshot: &'a Value, field_id: &str) -> Option<&'a Value> {
    snapshot.get(field_id).filter(|value| !value.is_null())
}

/// String form of a present field value.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if !(number.is_i64() || number.is_u64()) => format_number(float),
            _ => number.to_string(),
        },
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".into(),
    }
}

/// Shortest round-trip decimal form, as form state renders numbers.
///
/// Integral values drop the fractional part, and magnitudes outside
/// `[1e-6, 1e21)` use exponent notation with an explicit sign (`1e+21`, `1e-7`).
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        return "NaN".into();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if number == 0.0 {
        return "0".into();
    }
    let magnitude = number.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{number:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    number.to_string()
}

/// Parses a finite number, tolerating surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Whether a snapshot value counts as blank.
pub fn is_blank(value: Option<&Value>) -> bool {
    value.is_none_or(|value| stringify(value).trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(stringify(&json!(10)), "10");
        assert_eq!(stringify(&json!(10.0)), "10");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(-3)), "-3");
    }

    #[test]
    fn large_and_tiny_numbers_use_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e21), "1.5e+21");
        assert_eq!(format_number(-2e22), "-2e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(stringify(&json!(1e21)), "1e+21");
    }

    #[test]
    fn arrays_join_with_commas() {
        assert_eq!(stringify(&json!(["a", "b"])), "a,b");
        assert_eq!(stringify(&json!(["a", null, 2])), "a,,2");
        assert_eq!(stringify(&json!([])), "");
    }

    #[test]
    fn scalars_and_objects() {
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn parse_number_rejects_blank_and_text() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("-1.25"), Some(-1.25));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn null_is_absent() {
        let snapshot = json!({ "a": null, "b": "" });
        assert!(lookup(&snapshot, "a").is_none());
        assert!(lookup(&snapshot, "missing").is_none());
        assert_eq!(lookup(&snapshot, "b"), Some(&json!("")));
    }
}
