//! Shared shape of the persisted entities

use std::fmt;

/// A persisted record with a primary key, a create payload and a patch type.
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: Clone + PartialEq + fmt::Display + Send + Sync + 'static;
    type New: Send + 'static;
    type Patch: Send + 'static;

    /// Lowercase resource name used in error bodies and logs.
    const RESOURCE: &'static str;

    /// Capitalised label used in delete confirmations.
    const LABEL: &'static str;

    fn key(&self) -> &Self::Key;

    /// Key chosen by the caller in a create payload.
    ///
    /// `None` when the store generates the key.
    fn requested_key(new: &Self::New) -> Option<&Self::Key>;

    /// Overwrite the fields present in `patch`, leaving the rest untouched.
    fn apply(&mut self, patch: Self::Patch);
}
