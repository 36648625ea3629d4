use std::fmt;

/// Content of one main memory slot. The tag is whatever was written last.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemoryValue {
    Integer(i64),
    Text(String),
}

impl MemoryValue {
    pub fn is_integer(&self) -> bool {
        matches!(self, MemoryValue::Integer(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, MemoryValue::Text(_))
    }

    // Integer payload, if this cell currently holds a number
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            MemoryValue::Integer(value) => Some(value),
            MemoryValue::Text(_) => None,
        }
    }

    // Text payload, if this cell currently holds a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MemoryValue::Integer(_) => None,
            MemoryValue::Text(s) => Some(s.as_str()),
        }
    }

    /// Name of the tag as shown by the RAM view ("number" or "string").
    pub fn kind(&self) -> &'static str {
        match self {
            MemoryValue::Integer(_) => "number",
            MemoryValue::Text(_) => "string",
        }
    }
}

impl From<i64> for MemoryValue {
    fn from(value: i64) -> Self {
        MemoryValue::Integer(value)
    }
}

impl From<i32> for MemoryValue {
    fn from(value: i32) -> Self {
        MemoryValue::Integer(value as i64)
    }
}

impl From<String> for MemoryValue {
    fn from(value: String) -> Self {
        MemoryValue::Text(value)
    }
}

impl From<&str> for MemoryValue {
    fn from(value: &str) -> Self {
        MemoryValue::Text(value.to_string())
    }
}

// Numbers are printed bare, strings quoted
impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::Integer(value) => write!(f, "{}", value),
            MemoryValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_text_only() {
        assert_eq!(MemoryValue::Integer(-7).to_string(), "-7");
        assert_eq!(MemoryValue::from("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn test_accessors_follow_tag() {
        let number = MemoryValue::from(42);
        assert!(number.is_integer());
        assert_eq!(number.as_integer(), Some(42));
        assert_eq!(number.as_text(), None);
        assert_eq!(number.kind(), "number");

        let text = MemoryValue::from(String::from("abc"));
        assert!(text.is_text());
        assert_eq!(text.as_text(), Some("abc"));
        assert_eq!(text.as_integer(), None);
        assert_eq!(text.kind(), "string");
    }

    #[test]
    fn test_numeric_text_is_not_coerced() {
        let text = MemoryValue::from("42");
        assert_ne!(text, MemoryValue::Integer(42));
        assert_eq!(text.as_integer(), None);
    }
}
