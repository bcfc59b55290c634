use core::fmt::Debug;
use core::hash::BuildHasher;

use crate::error::TableError;
use crate::hash_table::HashTable;
use crate::hashers::DefaultHashBuilder;

/// A set of byte strings, stored in a [`HashTable`] with zero-width values.
///
/// # Examples
///
/// ```rust
/// use robin_hash::HashSet;
///
/// let mut set = HashSet::new();
/// assert_eq!(set.insert(b"Kamen Rider"), Ok(true));
/// assert_eq!(set.insert(b"Kamen Rider"), Ok(false));
/// assert!(set.contains(b"Kamen Rider"));
/// ```
#[derive(Clone)]
pub struct HashSet<S = DefaultHashBuilder> {
    table: HashTable<S>,
}

impl<S> PartialEq for HashSet<S>
where
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|key| other.contains(key))
    }
}

impl<S> Eq for HashSet<S> where S: BuildHasher {}

impl<S> Debug for HashSet<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl HashSet<DefaultHashBuilder> {
    /// Creates an empty set using the default hash builder.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty set with `capacity` slots using the default hash
    /// builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl Default for HashSet<DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HashSet<S> {
    /// Creates an empty set hashing keys with `hash_builder`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashSet;
    /// use robin_hash::hashers::SaxBuildHasher;
    ///
    /// let set = HashSet::with_hasher(SaxBuildHasher::default());
    /// assert!(set.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::with_hasher(0, hash_builder),
        }
    }

    /// Creates an empty set with `capacity` slots hashing keys with
    /// `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity_and_hasher(0, capacity, hash_builder),
        }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every key, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the keys in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.table.keys()
    }
}

impl<S> HashSet<S>
where
    S: BuildHasher,
{
    /// Adds `key` to the set.
    ///
    /// Returns `Ok(false)` if the key was already present.
    pub fn insert(&mut self, key: &[u8]) -> Result<bool, TableError> {
        match self.table.insert(key, &[]) {
            Ok(_) => Ok(true),
            Err(TableError::DuplicateKey) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Returns `true` if the set contains `key`.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.table.contains_key(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.table.remove(key).is_ok()
    }
}
