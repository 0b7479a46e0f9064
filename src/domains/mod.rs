//! Domains module containing business logic organized by bounded contexts.
//!
//! - **services**: the portal resources and their HTTP handlers
//! - **store**: in-memory storage shared by the stateful resources

pub mod services;
pub mod store;
