//! Application-level configuration.
//!
//! - [`ChatConfig`]: directive, user id and preferred provider for chat turns

pub mod chat_config;

pub use chat_config::{ChatConfig, DEFAULT_DIRECTIVE, DEFAULT_USER_ID};
