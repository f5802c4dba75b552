//! Conversion of JSON objects into [`Record`]s.

use serde_json::Value;

use crate::bail;
use crate::error::{ErrorKind, IngestResult};
use crate::types::{Cell, Record};

/// Parses a JSON object string into a [`Record`].
///
/// Scalar members map onto [`Cell`] variants; integers outside the `i64`
/// range, floats, and nested arrays or objects fail with
/// [`ErrorKind::InvalidData`]. Date strings are kept as [`Cell::String`] and
/// parsed lazily by consumers.
pub fn record_from_json(raw: &str) -> IngestResult<Record> {
    let value: Value = serde_json::from_str(raw)?;

    let Value::Object(members) = value else {
        bail!(
            ErrorKind::InvalidData,
            "JSON record must be an object",
            format!("got a JSON {}", json_type_name(&value))
        );
    };

    let mut record = Record::new();
    for (field, member) in members {
        let cell = match member {
            Value::Null => Cell::Null,
            Value::Bool(value) => Cell::Bool(value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => Cell::I64(value),
                None => bail!(
                    ErrorKind::InvalidData,
                    "JSON number is not a supported cell value",
                    format!("field '{field}' holds unsupported number {number}")
                ),
            },
            Value::String(value) => Cell::String(value),
            nested @ (Value::Array(_) | Value::Object(_)) => bail!(
                ErrorKind::InvalidData,
                "JSON record fields must be scalar",
                format!(
                    "field '{field}' holds a nested JSON {}",
                    json_type_name(&nested)
                )
            ),
        };

        record.set(field, cell);
    }

    Ok(record)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_object() {
        let record = record_from_json(
            r#"{"Customer_Id": "123457", "Country": "USA", "Age": 37, "Is_Active": null}"#,
        )
        .unwrap();

        assert_eq!(record.get("Customer_Id"), Some(&Cell::from("123457")));
        assert_eq!(record.get("Country"), Some(&Cell::from("USA")));
        assert_eq!(record.get("Age"), Some(&Cell::I64(37)));
        assert_eq!(record.get("Is_Active"), Some(&Cell::Null));
    }

    #[test]
    fn rejects_non_object_payloads() {
        let err = record_from_json(r#"["USA", "IND"]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_nested_members() {
        let err = record_from_json(r#"{"Country": {"code": "USA"}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn surfaces_syntax_errors_as_deserialization_failures() {
        let err = record_from_json("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationError);
    }
}
