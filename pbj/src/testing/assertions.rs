//! Assertions for message state and error codes.

use crate::errors::Result;
use crate::message::Message;
use crate::value::Value;

/// Asserts that `result` failed with the given [`crate::PbjError::code`].
pub fn assert_error_code<T: std::fmt::Debug>(result: &Result<T>, code: &str) {
    match result {
        Ok(value) => panic!("Expected error '{code}', got Ok({value:?})"),
        Err(err) => assert_eq!(err.code(), code, "Unexpected error: {err}"),
    }
}

/// Asserts that the set field holds exactly these strings, in order.
pub fn assert_set_strings(message: &Message, field: &str, expected: &[&str]) {
    let actual: Vec<&str> = message
        .get_set(field)
        .unwrap_or_else(|e| panic!("Failed to read set '{field}': {e}"))
        .into_iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(actual, expected, "Unexpected members in set '{field}'");
}

/// Asserts that a single-value field reads as `expected`.
pub fn assert_single(message: &Message, field: &str, expected: &Value) {
    let actual = message
        .get_single(field)
        .unwrap_or_else(|e| panic!("Failed to read '{field}': {e}"));
    assert_eq!(actual.as_deref(), Some(expected), "Unexpected value for '{field}'");
}

/// Asserts that a message and every nested message is frozen.
pub fn assert_deeply_frozen(message: &Message) {
    assert!(message.is_frozen(), "Expected [{}] to be frozen", message.schema().id());
    for field in message.schema().fields() {
        if let Ok(Some(nested)) = message.get_message(field.name()) {
            assert_deeply_frozen(nested);
        }
    }
}
