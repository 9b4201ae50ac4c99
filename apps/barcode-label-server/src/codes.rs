//! Request body normalization
//!
//! Turns the raw JSON body of a label request into either an ordered,
//! non-empty list of codes or a base64 PDF to decode.

use std::fmt;

use serde_json::Value;

use crate::error::{AppError, Result};

/// One barcode payload, passed through to the encoder untouched
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code(String);

impl Code {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a combined-endpoint body asks for
#[derive(Debug, Clone, PartialEq)]
pub enum LabelRequest {
    /// Render these codes, in order
    Generate(Vec<Code>),
    /// Decode barcodes from this base64-encoded PDF
    Decode(String),
}

/// Parse a body that must carry `codes`.
pub fn parse_codes_body(body: &[u8]) -> Result<Vec<Code>> {
    let object = parse_object(body)?;
    match object.get("codes") {
        None | Some(Value::Null) => Err(AppError::InvalidInput(
            "Provide an array of codes".to_string(),
        )),
        Some(codes) => normalize_codes(codes),
    }
}

/// Parse a body that must carry `file`.
pub fn parse_file_body(body: &[u8]) -> Result<String> {
    let object = parse_object(body)?;
    file_field(object.get("file"))?
        .ok_or_else(|| AppError::InvalidInput("Provide a base64-encoded PDF in `file`".to_string()))
}

/// Parse a body for the combined endpoint: `codes` wins over `file`.
pub fn parse_label_request(body: &[u8]) -> Result<LabelRequest> {
    let object = parse_object(body)?;

    match object.get("codes") {
        None | Some(Value::Null) => {}
        Some(codes) => return normalize_codes(codes).map(LabelRequest::Generate),
    }

    match file_field(object.get("file"))? {
        Some(file) => Ok(LabelRequest::Decode(file)),
        None => Err(AppError::InvalidInput("No codes or file provided".to_string())),
    }
}

/// Normalize a `codes` value into a non-empty ordered sequence.
///
/// A bare string becomes a one-element list. Anything other than a string
/// or an array of non-empty strings is rejected.
pub fn normalize_codes(value: &Value) -> Result<Vec<Code>> {
    let codes = match value {
        Value::String(code) => vec![Code::new(code.as_str())],
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(code) => Ok(Code::new(code.as_str())),
                other => Err(AppError::InvalidInput(format!(
                    "codes[{}] must be a string, got {}",
                    index,
                    type_name(other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(AppError::InvalidInput(format!(
                "codes must be a string or an array of strings, got {}",
                type_name(other)
            )))
        }
    };

    if codes.is_empty() {
        return Err(AppError::InvalidInput("Provide an array of codes".to_string()));
    }

    if let Some(index) = codes.iter().position(|c| c.as_str().is_empty()) {
        return Err(AppError::InvalidInput(format!("codes[{}] is empty", index)));
    }

    Ok(codes)
}

fn parse_object(body: &[u8]) -> Result<serde_json::Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(AppError::InvalidInput(format!(
            "Request body must be a JSON object, got {}",
            type_name(&other)
        ))),
        Err(e) => Err(AppError::InvalidInput(format!("Malformed JSON body: {}", e))),
    }
}

fn file_field(value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(file)) if file.is_empty() => Ok(None),
        Some(Value::String(file)) => Ok(Some(file.clone())),
        Some(other) => Err(AppError::InvalidInput(format!(
            "file must be a base64 string, got {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codes(values: &[&str]) -> Vec<Code> {
        values.iter().map(|v| Code::new(*v)).collect()
    }

    fn is_invalid(result: Result<impl std::fmt::Debug>) -> bool {
        matches!(result, Err(AppError::InvalidInput(_)))
    }

    #[test]
    fn test_single_string_matches_one_element_list() {
        let single = normalize_codes(&json!("ABC123")).unwrap();
        let list = normalize_codes(&json!(["ABC123"])).unwrap();
        assert_eq!(single, list);
        assert_eq!(single, codes(&["ABC123"]));
    }

    #[test]
    fn test_order_is_preserved() {
        let normalized = normalize_codes(&json!(["C", "A", "B", "A"])).unwrap();
        assert_eq!(normalized, codes(&["C", "A", "B", "A"]));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(is_invalid(normalize_codes(&json!([]))));
        assert!(is_invalid(normalize_codes(&json!(["A", 1]))));
        assert!(is_invalid(normalize_codes(&json!(["A", null]))));
        assert!(is_invalid(normalize_codes(&json!(42))));
        assert!(is_invalid(normalize_codes(&json!({"code": "A"}))));
        assert!(is_invalid(normalize_codes(&json!(""))));
        assert!(is_invalid(normalize_codes(&json!(["A", ""]))));
    }

    #[test]
    fn test_parse_codes_body() {
        assert_eq!(
            parse_codes_body(br#"{"codes": "123456789012"}"#).unwrap(),
            codes(&["123456789012"])
        );
        assert!(is_invalid(parse_codes_body(br#"{}"#)));
        assert!(is_invalid(parse_codes_body(br#"{"codes": null}"#)));
        assert!(is_invalid(parse_codes_body(br#"["A"]"#)));
        assert!(is_invalid(parse_codes_body(b"not json")));
        assert!(is_invalid(parse_codes_body(b"")));
    }

    #[test]
    fn test_combined_request_dispatch() {
        assert_eq!(
            parse_label_request(br#"{"codes": ["A", "B"], "file": "JVBERi0="}"#).unwrap(),
            LabelRequest::Generate(codes(&["A", "B"]))
        );
        assert_eq!(
            parse_label_request(br#"{"file": "JVBERi0="}"#).unwrap(),
            LabelRequest::Decode("JVBERi0=".to_string())
        );
        assert!(is_invalid(parse_label_request(br#"{}"#)));
        assert!(is_invalid(parse_label_request(br#"{"file": 12}"#)));
    }

    #[test]
    fn test_parse_file_body() {
        assert_eq!(parse_file_body(br#"{"file": "AAAA"}"#).unwrap(), "AAAA");
        assert!(is_invalid(parse_file_body(br#"{"file": ""}"#)));
        assert!(is_invalid(parse_file_body(br#"{"codes": ["A"]}"#)));
    }
}
