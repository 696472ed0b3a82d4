#![forbid(unsafe_code)]

//! Content shown inside the drawer.
//!
//! The drawer does not fetch anything. It records which resource the host
//! wants shown ([`ContentKey`]) and in which order ([`SortKey`]), asks for a
//! reload whenever either changes, and holds whatever items the host
//! delivers along with a loading flag for the placeholder.
//!
//! Every [`ReloadRequest`] carries a generation. A delivery is accepted only
//! for the latest request, so a slow response for an earlier key or sort
//! can never overwrite the current one.

use std::fmt;

#[cfg(feature = "tracing")]
use crate::logging::{debug, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, warn};

/// Identity of the resource whose content the drawer shows (e.g. a thread id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentKey(String);

impl ContentKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ordering the host should fetch with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Top,
}

/// A reload the host's fetch collaborator should perform. Hand it back to
/// [`ContentFeed::set_items`] with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub key: ContentKey,
    pub sort: SortKey,
    generation: u64,
}

impl ReloadRequest {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Items plus loading state for the current key.
#[derive(Debug, Clone)]
pub struct ContentFeed<T> {
    key: Option<ContentKey>,
    sort: SortKey,
    items: Vec<T>,
    loading: bool,
    generation: u64,
}

impl<T> Default for ContentFeed<T> {
    fn default() -> Self {
        Self {
            key: None,
            sort: SortKey::default(),
            items: Vec::new(),
            loading: false,
            generation: 0,
        }
    }
}

impl<T> ContentFeed<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(&self) -> Option<&ContentKey> {
        self.key.as_ref()
    }

    #[must_use]
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loading with nothing to show yet.
    #[must_use]
    pub fn show_placeholder(&self) -> bool {
        self.loading && self.items.is_empty()
    }

    /// Point the feed at `key`. Returns a reload request if the key changed.
    /// Items from a different key are dropped immediately.
    pub fn set_key(&mut self, key: ContentKey) -> Option<ReloadRequest> {
        if self.key.as_ref() == Some(&key) {
            return None;
        }
        self.items.clear();
        self.key = Some(key);
        self.request_reload()
    }

    /// Change the ordering. Returns a reload request if it changed and a
    /// key is set. Existing items stay visible until the reload lands.
    pub fn set_sort(&mut self, sort: SortKey) -> Option<ReloadRequest> {
        if self.sort == sort {
            return None;
        }
        self.sort = sort;
        self.request_reload()
    }

    fn request_reload(&mut self) -> Option<ReloadRequest> {
        let key = self.key.clone()?;
        self.loading = true;
        self.generation += 1;
        debug!(key = %key, sort = ?self.sort, generation = self.generation, "content reload requested");
        Some(ReloadRequest {
            key,
            sort: self.sort,
            generation: self.generation,
        })
    }

    /// Whether `request` is the latest one issued.
    #[must_use]
    pub fn is_current(&self, request: &ReloadRequest) -> bool {
        request.generation == self.generation
    }

    /// Deliver the items fetched for `request` and clear the loading flag.
    /// Deliveries for a superseded request are dropped; returns whether the
    /// items were accepted.
    pub fn set_items(&mut self, request: &ReloadRequest, items: Vec<T>) -> bool {
        if !self.is_current(request) {
            warn!(
                key = %request.key,
                generation = request.generation,
                current = self.generation,
                "stale content delivery dropped"
            );
            return false;
        }
        self.items = items;
        self.loading = false;
        true
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}
