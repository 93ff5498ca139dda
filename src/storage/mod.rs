//! Storage modules: config, history, key-value persistence

pub mod config;
pub mod history;
pub mod kv;
