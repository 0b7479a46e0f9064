//! Service definitions module.
//!
//! Each portal resource lives in its own file: the model, its validation,
//! the service operating on the store and the HTTP handlers.

pub mod calculator;
pub mod catalog;
pub mod converter;
pub mod quotes;
pub mod random;
pub mod shortener;
pub mod tasks;

pub use calculator::{Calculator, Operation};
pub use catalog::{CatalogFilter, CatalogItem, CatalogService, Work};
pub use converter::{Category, Conversion, Converter, Unit};
pub use quotes::{Quote, QuoteService};
pub use random::RandomGenerator;
pub use shortener::{Shortened, ShortenerService};
pub use tasks::{Task, TaskPatch, TaskService};
