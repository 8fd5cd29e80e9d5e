//! Per-run context handed to every handler.

use serde_yaml::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Values shared with every step of a run.
///
/// Cheap to clone; procedures receive their own copy.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    values: Arc<HashMap<String, Value>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from configured `vars`.
    pub fn from_values(values: HashMap<String, Value>) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    /// Return a context with `key` set to `value`.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.values).insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up `key` as an integer.
    pub fn i64(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(Value::as_i64)
    }

    /// Look up `key` as a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_value_does_not_touch_clones() {
        let base = RunContext::new().with_value("age", 18);
        let extended = base.clone().with_value("region", "eu");

        assert_eq!(base.i64("age"), Some(18));
        assert_eq!(base.str("region"), None);
        assert_eq!(extended.str("region"), Some("eu"));
        assert_eq!(extended.i64("age"), Some(18));
    }

    #[test]
    fn test_from_values() {
        let mut values = HashMap::new();
        values.insert("env".to_string(), Value::from("test"));
        let ctx = RunContext::from_values(values);
        assert_eq!(ctx.str("env"), Some("test"));
        assert!(ctx.value("missing").is_none());
    }
}
