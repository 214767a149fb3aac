//! UUID v7 utilities for time-ordered identifiers.
//!
//! Rows are keyed with UUIDv7, which embeds a millisecond timestamp in
//! the first 48 bits. Ids therefore sort in creation order, which keeps
//! "newest first" listings cheap.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use growflow_core::uuid_utils::new_v7;
///
/// let id = new_v7();
/// // IDs generated later will be lexicographically greater
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
