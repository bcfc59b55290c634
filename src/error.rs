//! Error types for the `robin-hash` crate.

use alloc::collections::TryReserveError;

/// Errors reported by table operations.
///
/// Every operation that returns one of these leaves the table exactly as it
/// was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// A fallible reservation for slot, value, or key storage failed.
    #[error("failed to allocate storage for the table")]
    AllocFailed,

    /// A size computation overflowed `usize`.
    ///
    /// Raised when doubling the slot count, or multiplying it by the value
    /// width, no longer fits in the address space.
    #[error("table capacity overflow")]
    CapacityOverflow,

    /// The key is already present.
    ///
    /// Insertion never places a second entry for an existing key; use
    /// [`get_mut`](crate::HashTable::get_mut) to overwrite a stored value.
    #[error("key is already present in the table")]
    DuplicateKey,

    /// The key is not present.
    #[error("key not found")]
    KeyNotFound,

    /// A value slice did not match the table's fixed value width.
    #[error("value is {found} bytes but the table stores {expected}-byte values")]
    ValueSize {
        /// Width fixed at construction.
        expected: usize,
        /// Width of the rejected slice.
        found: usize,
    },
}

impl From<TryReserveError> for TableError {
    fn from(_: TryReserveError) -> Self {
        TableError::AllocFailed
    }
}
