pub mod body;
pub mod handler;
pub mod listener;
pub mod query;
pub mod request;

#[cfg(test)]
mod request_test;
