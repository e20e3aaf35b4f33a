use serde_json::Value;

/// Arguments bound to a handler's parameters, in declaration order.
///
/// Optional parameters that were not supplied are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, param: impl Into<String>, value: Value) {
        self.values.push((param.into(), value));
    }

    pub fn get(&self, param: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == param)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, param: &str) -> Option<&str> {
        self.get(param).and_then(Value::as_str)
    }

    pub fn get_i64(&self, param: &str) -> Option<i64> {
        self.get(param).and_then(|value| match value {
            Value::String(text) => text.parse().ok(),
            other => other.as_i64(),
        })
    }

    pub fn get_bool(&self, param: &str) -> Option<bool> {
        self.get(param).and_then(|value| match value {
            Value::String(text) => text.parse().ok(),
            other => other.as_bool(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
