pub mod export;
pub mod json_store;
pub mod schema;
pub mod source;
