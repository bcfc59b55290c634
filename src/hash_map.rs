use core::fmt::Debug;
use core::hash::BuildHasher;
use core::marker::PhantomData;

use bytemuck::Pod;

use crate::error::TableError;
use crate::hash_table::HashTable;
use crate::hashers::DefaultHashBuilder;

/// A map from byte-string keys to plain-old-data values, stored in a
/// [`HashTable`] whose value width is `size_of::<V>()`.
///
/// Values are kept as raw bytes in the table, so they are copied in and out
/// rather than borrowed; use [`update`](HashMap::update) to modify one in
/// place.
///
/// # Examples
///
/// ```rust
/// use robin_hash::HashMap;
///
/// let mut map: HashMap<u64> = HashMap::new();
/// map.insert(b"abc", 0xa000_0000_0000).unwrap();
///
/// assert_eq!(map.get(b"abc"), Some(0xa000_0000_0000));
/// assert_eq!(map.get(b"rocket"), None);
/// ```
#[derive(Clone)]
pub struct HashMap<V, S = DefaultHashBuilder> {
    table: HashTable<S>,
    _phantom: PhantomData<V>,
}

impl<V, S> Debug for HashMap<V, S>
where
    V: Pod + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(&k, &v);
        }
        map.finish()
    }
}

impl<V: Pod> HashMap<V, DefaultHashBuilder> {
    /// Creates an empty map using the default hash builder.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty map with `capacity` slots using the default hash
    /// builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashMap;
    ///
    /// let map: HashMap<u32> = HashMap::with_capacity(100);
    /// assert_eq!(map.capacity(), 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<V: Pod> Default for HashMap<V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Pod, S> HashMap<V, S> {
    /// Creates an empty map hashing keys with `hash_builder`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashMap;
    /// use robin_hash::hashers::Murmur3BuildHasher;
    ///
    /// let map: HashMap<u16, _> = HashMap::with_hasher(Murmur3BuildHasher::default());
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::with_hasher(size_of::<V>(), hash_builder),
            _phantom: PhantomData,
        }
    }

    /// Creates an empty map with `capacity` slots hashing keys with
    /// `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity_and_hasher(size_of::<V>(), capacity, hash_builder),
            _phantom: PhantomData,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every entry, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], V)> + '_ {
        self.table
            .iter()
            .map(|(key, value)| (key, bytemuck::pod_read_unaligned(value)))
    }

    /// Returns an iterator over the keys in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.table.keys()
    }

    /// Returns the underlying byte table.
    pub fn as_table(&self) -> &HashTable<S> {
        &self.table
    }
}

impl<V, S> HashMap<V, S>
where
    V: Pod,
    S: BuildHasher,
{
    /// Inserts `value` for a key that is not yet present.
    ///
    /// Returns [`TableError::DuplicateKey`] if the key already has a value;
    /// use [`insert_or_replace`](Self::insert_or_replace) to overwrite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashMap;
    /// use robin_hash::TableError;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(b"(0000)", 1u8).unwrap();
    /// assert_eq!(map.insert(b"(0000)", 2), Err(TableError::DuplicateKey));
    /// assert_eq!(map.get(b"(0000)"), Some(1));
    /// ```
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<(), TableError> {
        self.table.insert(key, bytemuck::bytes_of(&value))?;
        Ok(())
    }

    /// Stores `value` for `key`, overwriting in place if the key is present.
    ///
    /// Returns the previous value, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert_or_replace(b"k", 1i32), Ok(None));
    /// assert_eq!(map.insert_or_replace(b"k", 2), Ok(Some(1)));
    /// assert_eq!(map.get(b"k"), Some(2));
    /// ```
    pub fn insert_or_replace(&mut self, key: &[u8], value: V) -> Result<Option<V>, TableError> {
        if let Some(bytes) = self.table.get_mut(key) {
            let previous = bytemuck::pod_read_unaligned(bytes);
            bytes.copy_from_slice(bytemuck::bytes_of(&value));
            return Ok(Some(previous));
        }

        self.table.insert(key, bytemuck::bytes_of(&value))?;
        Ok(None)
    }

    /// Returns a copy of the value stored for `key`.
    pub fn get(&self, key: &[u8]) -> Option<V> {
        self.table.get(key).map(bytemuck::pod_read_unaligned)
    }

    /// Applies `f` to the value stored for `key`, returning `false` if the
    /// key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(b"hits", 0u32).unwrap();
    /// assert!(map.update(b"hits", |hits| *hits += 1));
    /// assert!(!map.update(b"misses", |misses| *misses += 1));
    /// assert_eq!(map.get(b"hits"), Some(1));
    /// ```
    pub fn update(&mut self, key: &[u8], f: impl FnOnce(&mut V)) -> bool {
        let Some(bytes) = self.table.get_mut(key) else {
            return false;
        };
        let mut value: V = bytemuck::pod_read_unaligned(bytes);
        f(&mut value);
        bytes.copy_from_slice(bytemuck::bytes_of(&value));
        true
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let value = self.get(key)?;
        self.table.remove(key).ok()?;
        Some(value)
    }

    /// Returns `true` if the map holds a value for `key`.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.table.contains_key(key)
    }
}
