pub mod json_parser;
pub mod serializer;

pub use json_parser::JsonParser;
pub use serializer::{marshal_fields_to_json, write_json_row, write_json_rows};

#[cfg(test)]
mod json_parser_test;
