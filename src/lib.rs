#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Error types reported by table operations.
pub mod error;

/// A typed map from byte-string keys to plain-old-data values.
///
/// This module provides a `HashMap` that wraps the `HashTable` and converts
/// values to and from their byte representation with `bytemuck`.
pub mod hash_map;

/// A set of byte strings.
///
/// This module provides a `HashSet` backed by a `HashTable` whose values are
/// zero bytes wide.
pub mod hash_set;

pub mod hash_table;

pub mod hashers;

pub use error::TableError;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hashers::DefaultHashBuilder;
