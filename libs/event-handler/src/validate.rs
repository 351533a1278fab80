use event_api::EventRecord;
use serde_json::Value;

use crate::config::FieldSpec;
use crate::error::HandlerError;

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy, everything
/// else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Check every required field in schema order, stopping at the first
/// one that is missing, of the wrong type, or falsy.
///
/// A parsed body that is not an object has no fields at all and fails
/// the same way.
pub fn verify_fields<'a>(data: &'a Value, fields: &[FieldSpec]) -> Result<&'a EventRecord, HandlerError> {
    let record = data.as_object().ok_or(HandlerError::Validation)?;
    for field in fields {
        match record.get(&field.name) {
            Some(value) if field.ty.matches(value) && is_truthy(value) => {}
            _ => return Err(HandlerError::Validation),
        }
    }
    Ok(record)
}

/// Exact-match membership of the `event` value in the allow-list.
pub fn verify_event(event: Option<&Value>, events: &[String]) -> Result<(), HandlerError> {
    let name = event.and_then(Value::as_str).ok_or(HandlerError::UnsupportedEvent)?;
    if events.iter().any(|e| e == name) {
        Ok(())
    } else {
        Err(HandlerError::UnsupportedEvent)
    }
}
