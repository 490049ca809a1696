//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod failover;
pub mod run_chat_turn;

#[cfg(test)]
pub(crate) mod test_support;
