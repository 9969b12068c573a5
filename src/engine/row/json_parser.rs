use serde_json::{Map, Value};

use crate::engine::errors::JsonParseError;
use crate::engine::pool::Reusable;
use crate::engine::types::Field;

/// Parses one JSON log line into a flat list of fields.
///
/// Nested objects are flattened into `.`-joined names, strings are kept as
/// is, numbers and booleans are stringified, arrays are kept as their JSON
/// text and nulls are dropped. Field order follows the source object.
#[derive(Debug, Default)]
pub struct JsonParser {
    fields: Vec<Field>,
    prefix: String,
}

impl JsonParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_log_message(&mut self, msg: &[u8]) -> Result<&[Field], JsonParseError> {
        self.reset();
        let value: Value = serde_json::from_slice(msg)?;
        match value {
            Value::Object(object) => {
                self.append_object(object);
                Ok(&self.fields)
            }
            other => Err(JsonParseError::NotAnObject(kind(&other))),
        }
    }

    /// Fields produced by the last successful parse.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn append_object(&mut self, object: Map<String, Value>) {
        for (key, value) in object {
            let prefix_len = self.prefix.len();
            if prefix_len > 0 {
                self.prefix.push('.');
            }
            self.prefix.push_str(&key);

            match value {
                Value::Null => {}
                Value::Object(nested) => self.append_object(nested),
                Value::String(s) => self.push_field(s),
                Value::Bool(b) => self.push_field(b.to_string()),
                Value::Number(n) => self.push_field(n.to_string()),
                array @ Value::Array(_) => self.push_field(array.to_string()),
            }

            self.prefix.truncate(prefix_len);
        }
    }

    fn push_field(&mut self, value: String) {
        self.fields.push(Field {
            name: self.prefix.clone(),
            value,
        });
    }
}

impl Reusable for JsonParser {
    fn reset(&mut self) {
        self.fields.clear();
        self.prefix.clear();
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
