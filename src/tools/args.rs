//! Typed access to tool-call arguments.

use serde_json::{Map, Value};

/// Read-only view over the `arguments` object of a tool call.
///
/// Accessors return a human-readable reason on failure; callers attach the
/// field label when turning it into a `ToolError`.
#[derive(Debug, Clone, Copy)]
pub struct ToolArgs<'a> {
    args: Option<&'a Map<String, Value>>,
}

impl<'a> ToolArgs<'a> {
    /// Wrap raw arguments. Anything but a JSON object counts as "no arguments".
    pub fn new(value: Option<&'a Value>) -> Self {
        Self {
            args: value.and_then(Value::as_object),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.args
            .and_then(|args| args.get(key))
            .filter(|v| !v.is_null())
    }

    /// Required string argument.
    pub fn require_str(&self, key: &str) -> Result<&'a str, String> {
        match self.get(key) {
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(_) => Err(format!("argument '{}' must be a string", key)),
            None => Err(format!("required argument '{}' is missing", key)),
        }
    }

    /// Required string argument that must contain something besides whitespace.
    pub fn require_non_empty_str(&self, key: &str) -> Result<&'a str, String> {
        let value = self.require_str(key)?;
        if value.trim().is_empty() {
            return Err(format!("argument '{}' must not be empty", key));
        }
        Ok(value)
    }

    /// Optional string argument.
    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>, String> {
        match self.get(key) {
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(format!("argument '{}' must be a string", key)),
            None => Ok(None),
        }
    }

    /// Required integer argument. Integral floats and numeric strings are accepted,
    /// since JSON clients often send every number as a double.
    pub fn require_int(&self, key: &str) -> Result<i64, String> {
        match self.get(key) {
            Some(value) => as_int(value).ok_or_else(|| format!("argument '{}' must be an integer", key)),
            None => Err(format!("required argument '{}' is missing", key)),
        }
    }

    /// Optional integer argument with a default.
    pub fn optional_int(&self, key: &str, default: i64) -> Result<i64, String> {
        match self.get(key) {
            Some(value) => as_int(value).ok_or_else(|| format!("argument '{}' must be an integer", key)),
            None => Ok(default),
        }
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
