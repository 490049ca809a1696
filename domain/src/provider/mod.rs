//! Provider domain.
//!
//! - [`fault::ProviderFault`]: typed failures raised by provider streams
//! - [`config::ProviderConfig`]: provider settings and the failover roster

pub mod config;
pub mod fault;
