use serde::{Deserialize, Serialize};

/// A position in a text buffer, counted in lines and characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    pub row: usize,
    pub column: usize,
}

/// A localized text mutation: replace the range `[start, end)` with `text`.
///
/// Positions are expressed in the sender's coordinate space at emission time.
/// On the wire a delta travels as untyped JSON and is forwarded verbatim by
/// the server; only receivers attempt to read this shape, and anything that
/// does not fit degrades to the full-content path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDelta {
    pub start: CursorPosition,
    pub end: CursorPosition,
    pub text: String,
}

impl EditDelta {
    /// Try to read a wire delta. Malformed payloads become `None`, which
    /// callers treat the same as a missing delta.
    pub fn from_wire(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_delta_parses() {
        let value = json!({
            "start": {"row": 0, "column": 0},
            "end": {"row": 0, "column": 3},
            "text": "abc"
        });
        let delta = EditDelta::from_wire(&value).unwrap();
        assert_eq!(delta.start, CursorPosition { row: 0, column: 0 });
        assert_eq!(delta.end, CursorPosition { row: 0, column: 3 });
        assert_eq!(delta.text, "abc");
    }

    #[test]
    fn malformed_wire_delta_is_none() {
        assert!(EditDelta::from_wire(&json!({"bogus": true})).is_none());
        assert!(EditDelta::from_wire(&json!("not an object")).is_none());
    }
}
