//! Store domain module.
//!
//! In-process storage for every stateful resource of the portal. Nothing
//! here is durable: all records live in memory and are lost when the
//! process exits.
//!
//! ## Architecture
//!
//! - `record_store.rs` - Id-keyed collections (tasks, quotes, catalog items)
//! - `link_store.rs` - Code-keyed short link table with a reverse index
//! - `error.rs` - Store-specific error types
//!
//! Each store owns exactly one lock. The id counter lives behind the same
//! lock as the records, so concurrent creates never share an id.

mod error;
mod link_store;
mod record_store;

pub use error::{StoreError, StoreResult};
pub use link_store::{LinkInsert, LinkStore};
pub use record_store::{Record, RecordStore};
