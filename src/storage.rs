pub mod kv;
pub mod persist;
