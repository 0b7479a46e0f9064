//! Short link table.
//!
//! Maps short codes to target URLs. A reverse index from target URL to code
//! makes the "already shortened?" check a single lookup.

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::{StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    by_code: HashMap<String, String>,
    by_url: HashMap<String, String>,
}

/// Outcome of [`LinkStore::insert_unique`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkInsert {
    /// The URL was already shortened; this is its existing code.
    Existing(String),
    /// A new mapping was created under this code.
    Created(String),
    /// Every generated candidate collided with an existing code.
    Exhausted,
}

/// In-memory short link table.
#[derive(Default)]
pub struct LinkStore {
    inner: RwLock<Inner>,
}

impl LinkStore {
    /// Create an empty link table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target URL for `code`, if any.
    pub fn resolve(&self, code: &str) -> StoreResult<Option<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("resolve"))?;
        Ok(inner.by_code.get(code).cloned())
    }

    /// Store `url` under a freshly generated code unless it is already known.
    ///
    /// The dedup check and the insert happen under a single write lock. One
    /// initial candidate plus up to `max_retries` regenerated candidates are
    /// tried before giving up with [`LinkInsert::Exhausted`].
    pub fn insert_unique(
        &self,
        url: &str,
        mut generate: impl FnMut() -> String,
        max_retries: usize,
    ) -> StoreResult<LinkInsert> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;

        if let Some(code) = inner.by_url.get(url) {
            return Ok(LinkInsert::Existing(code.clone()));
        }

        for _ in 0..=max_retries {
            let code = generate();
            if inner.by_code.contains_key(&code) {
                continue;
            }
            inner.by_code.insert(code.clone(), url.to_string());
            inner.by_url.insert(url.to_string(), code.clone());
            return Ok(LinkInsert::Created(code));
        }

        Ok(LinkInsert::Exhausted)
    }
}
