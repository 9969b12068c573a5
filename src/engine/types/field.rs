use std::fmt;

/// Name of the reserved timestamp field. Values are opaque and compared bytewise.
pub const TIME_FIELD: &str = "_time";

/// A single `name=value` pair of a log record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.value)
    }
}

/// Fields of one parsed record, in source order.
pub type Row = Vec<Field>;

/// Returns the value of `name` within `fields`, if present.
pub fn field_value<'a>(fields: &'a [Field], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|field| field.name == name)
        .map(|field| field.value.as_str())
}
