//! A byte-keyed Robin Hood hash table with fixed-size values.
//!
//! Slot `i` of the table owns two things that always move together: an
//! optional bucket (hash and owned key bytes) and the `value_size` bytes
//! at `i * value_size` in a flat value array. Collisions are resolved by
//! linear probing with Robin Hood displacement, and removal uses
//! backward-shift deletion, so the table never holds tombstones.

use alloc::alloc::handle_alloc_error;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::ops::Range;

use crate::error::TableError;
use crate::hashers::DefaultHashBuilder;
use crate::hashers::hash_key;

/// Slot count used by [`HashTable::new`].
pub const DEFAULT_CAPACITY: usize = 64;

/// Slot count a zero-capacity table grows to on its first insertion.
const MIN_NONZERO_CAPACITY: usize = 8;

#[derive(Clone)]
struct Bucket {
    hash: u32,
    key: Box<[u8]>,
}

#[inline(always)]
fn home_slot(hash: u32, capacity: usize) -> usize {
    hash as usize % capacity
}

/// Number of slots an entry stored at `slot` sits past its home slot.
#[inline(always)]
fn displacement(hash: u32, slot: usize, capacity: usize) -> usize {
    (capacity + slot - home_slot(hash, capacity)) % capacity
}

#[inline(always)]
fn value_range(value_size: usize, slot: usize) -> Range<usize> {
    slot * value_size..(slot + 1) * value_size
}

fn try_copy_key(key: &[u8]) -> Result<Box<[u8]>, TableError> {
    let mut owned = Vec::new();
    owned.try_reserve_exact(key.len())?;
    owned.extend_from_slice(key);
    Ok(owned.into_boxed_slice())
}

fn try_alloc_slots(
    capacity: usize,
    value_size: usize,
) -> Result<(Vec<Option<Bucket>>, Vec<u8>), TableError> {
    let value_bytes = capacity
        .checked_mul(value_size)
        .ok_or(TableError::CapacityOverflow)?;

    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, || None);

    let mut values = Vec::new();
    values.try_reserve_exact(value_bytes)?;
    values.resize(value_bytes, 0);

    Ok((buckets, values))
}

/// Places `carried` using the Robin Hood walk.
///
/// Returns the slot the entry first came to rest in, along with its
/// displacement there. Any occupant it displaced is carried on to the next
/// free slot. `carried_value` holds the carried entry's value bytes on entry
/// and is left with unspecified contents.
///
/// The caller guarantees at least one empty slot.
fn robin_hood_place(
    buckets: &mut [Option<Bucket>],
    values: &mut [u8],
    value_size: usize,
    mut carried: Bucket,
    carried_value: &mut [u8],
) -> (usize, usize) {
    let capacity = buckets.len();
    debug_assert!(capacity > 0);

    let mut pos = home_slot(carried.hash, capacity);
    let mut probe = 0;
    let mut landed = None;

    loop {
        match &mut buckets[pos] {
            Some(occupant) => {
                let distance = displacement(occupant.hash, pos, capacity);
                if probe > distance {
                    core::mem::swap(occupant, &mut carried);
                    values[value_range(value_size, pos)].swap_with_slice(carried_value);
                    if landed.is_none() {
                        landed = Some((pos, probe));
                    }
                    probe = distance;
                }
            }
            None => {
                buckets[pos] = Some(carried);
                values[value_range(value_size, pos)].copy_from_slice(carried_value);
                return landed.unwrap_or((pos, probe));
            }
        }

        pos = (pos + 1) % capacity;
        probe += 1;
    }
}

#[cold]
fn alloc_failure(capacity: usize) -> ! {
    match Layout::array::<Option<Bucket>>(capacity) {
        Ok(layout) => handle_alloc_error(layout),
        Err(_) => panic!("capacity overflow"),
    }
}

/// Counts of occupied slots by probe distance.
///
/// Index `d` holds the number of entries sitting `d` slots past their home.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Entry counts per probe distance.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Largest probe distance of any entry, or `None` for an empty table.
    pub fn max_distance(&self) -> Option<usize> {
        self.counts.iter().rposition(|&count| count > 0)
    }

    /// Mean probe distance over all entries.
    pub fn mean(&self) -> f64 {
        let entries: usize = self.counts.iter().sum();
        if entries == 0 {
            return 0.0;
        }
        let total: usize = self
            .counts
            .iter()
            .enumerate()
            .map(|(distance, &count)| distance * count)
            .sum();
        total as f64 / entries as f64
    }

    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let entries: usize = self.counts.iter().sum();
        println!("probe histogram ({entries} entries):");
        for (distance, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{distance:>3} | {} ({count})", "█".repeat(width));
        }
    }
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries in the table
    pub populated: usize,
    /// Number of slots
    pub capacity: usize,
    /// Width in bytes of every stored value
    pub value_size: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Largest probe distance of any entry
    pub max_probe: usize,
    /// Mean probe distance
    pub mean_probe: f64,
    /// Bytes held by slot metadata, values, and owned keys
    pub total_bytes: usize,
    /// Bytes held by empty slots
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_probe, self.mean_probe
        );
        println!("Value size: {} bytes", self.value_size);
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing hash table from byte-string keys to fixed-size values,
/// using Robin Hood hashing with backward-shift deletion.
///
/// Every value stored in a `HashTable` is exactly [`value_size`] bytes wide;
/// the width is fixed at construction. Keys are arbitrary byte strings and
/// the table always stores its own copy of them.
///
/// Keys are hashed by building a hasher from `S`, writing the key bytes once,
/// and keeping the low 32 bits of the result. A key's home slot is that hash
/// modulo the slot count; the table never requires a power-of-two capacity.
///
/// The table grows by doubling when an insertion finds every slot occupied,
/// so it runs at load factors up to 1.0. Robin Hood displacement keeps probe
/// lengths short even at that density.
///
/// Iteration visits slots in bucket order. Any insertion or removal may move
/// entries, so slot indices from [`begin`] and [`next_slot`] are only
/// meaningful until the next mutation.
///
/// [`value_size`]: HashTable::value_size
/// [`begin`]: HashTable::begin
/// [`next_slot`]: HashTable::next_slot
///
/// ## Example
///
/// ```rust
/// use robin_hash::HashTable;
///
/// let mut table = HashTable::new(8);
/// table.insert(b"abc", &0xa000_0000_0000u64.to_le_bytes()).unwrap();
///
/// assert_eq!(table.get(b"abc"), Some(&0xa000_0000_0000u64.to_le_bytes()[..]));
/// assert_eq!(table.get(b"rocket"), None);
/// ```
#[derive(Clone)]
pub struct HashTable<S = DefaultHashBuilder> {
    buckets: Vec<Option<Bucket>>,
    values: Vec<u8>,
    /// One value-sized slot for the entry being carried through an insertion.
    carry: Vec<u8>,
    value_size: usize,
    populated: usize,
    hash_builder: S,
}

impl<S> Debug for HashTable<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        let capacity = self.capacity();
        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .buckets
                    .iter()
                    .enumerate()
                    .map(|(slot, bucket)| match bucket {
                        Some(b) => format!(
                            "{:08x}+{} {:?}",
                            b.hash,
                            displacement(b.hash, slot, capacity),
                            String::from_utf8_lossy(&b.key)
                        ),
                        None => "..".to_string(),
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &capacity)
            .field("value_size", &self.value_size)
            .finish()
    }
}

impl HashTable<DefaultHashBuilder> {
    /// Creates an empty table of [`DEFAULT_CAPACITY`] slots storing
    /// `value_size`-byte values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let table = HashTable::new(8);
    /// assert!(table.is_empty());
    /// assert_eq!(table.value_size(), 8);
    /// assert_eq!(table.capacity(), robin_hash::hash_table::DEFAULT_CAPACITY);
    /// ```
    pub fn new(value_size: usize) -> Self {
        Self::with_capacity(value_size, DEFAULT_CAPACITY)
    }

    /// Creates an empty table with exactly `capacity` slots.
    ///
    /// A capacity of 0 allocates nothing until the first insertion.
    pub fn with_capacity(value_size: usize, capacity: usize) -> Self {
        Self::with_capacity_and_hasher(value_size, capacity, DefaultHashBuilder::default())
    }

    /// Fallible version of [`new`](Self::new).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    /// use robin_hash::TableError;
    ///
    /// assert!(HashTable::try_new(4).is_ok());
    /// assert_eq!(
    ///     HashTable::try_with_capacity(usize::MAX, 2).unwrap_err(),
    ///     TableError::CapacityOverflow
    /// );
    /// ```
    pub fn try_new(value_size: usize) -> Result<Self, TableError> {
        Self::try_with_capacity(value_size, DEFAULT_CAPACITY)
    }

    /// Fallible version of [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(value_size: usize, capacity: usize) -> Result<Self, TableError> {
        Self::try_with_capacity_and_hasher(value_size, capacity, DefaultHashBuilder::default())
    }
}

impl<S> HashTable<S> {
    /// Creates an empty table of [`DEFAULT_CAPACITY`] slots hashing keys with
    /// `hash_builder`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    /// use robin_hash::hashers::ElfBuildHasher;
    ///
    /// let mut table = HashTable::with_hasher(4, ElfBuildHasher::default());
    /// table.insert(b"(0000)", &1u32.to_le_bytes()).unwrap();
    /// assert!(table.contains_key(b"(0000)"));
    /// ```
    pub fn with_hasher(value_size: usize, hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(value_size, DEFAULT_CAPACITY, hash_builder)
    }

    /// Creates an empty table with exactly `capacity` slots hashing keys with
    /// `hash_builder`.
    pub fn with_capacity_and_hasher(value_size: usize, capacity: usize, hash_builder: S) -> Self {
        match Self::try_with_capacity_and_hasher(value_size, capacity, hash_builder) {
            Ok(table) => table,
            Err(TableError::CapacityOverflow) => panic!("capacity overflow"),
            Err(_) => alloc_failure(capacity),
        }
    }

    /// Fallible version of
    /// [`with_capacity_and_hasher`](Self::with_capacity_and_hasher).
    pub fn try_with_capacity_and_hasher(
        value_size: usize,
        capacity: usize,
        hash_builder: S,
    ) -> Result<Self, TableError> {
        let (buckets, values) = try_alloc_slots(capacity, value_size)?;

        let mut carry = Vec::new();
        carry.try_reserve_exact(value_size)?;
        carry.resize(value_size, 0);

        Ok(Self {
            buckets,
            values,
            carry,
            value_size,
            populated: 0,
            hash_builder,
        })
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots.
    ///
    /// Unlike most hash tables this is also the number of entries the table
    /// holds before growing: growth happens only when every slot is full.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the fixed width of every stored value.
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Returns a reference to the table's hash builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns how far the entry at `slot` sits past its home slot, or
    /// `None` if the slot is empty or out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::new(0);
    /// table.insert(b"key", &[]).unwrap();
    ///
    /// let slot = table.begin();
    /// assert_eq!(table.probe_distance(slot), Some(0));
    /// assert_eq!(table.probe_distance(table.end()), None);
    /// ```
    pub fn probe_distance(&self, slot: usize) -> Option<usize> {
        let bucket = self.buckets.get(slot)?.as_ref()?;
        Some(displacement(bucket.hash, slot, self.capacity()))
    }

    /// Removes every entry, keeping the allocated slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(1, 4);
    /// for key in [b"a", b"b", b"c", b"d", b"e"] {
    ///     table.insert(key, &[key[0]]).unwrap();
    /// }
    /// let capacity = table.capacity();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// assert_eq!(table.get(b"a"), None);
    /// ```
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|bucket| *bucket = None);
        self.values.fill(0);
        self.populated = 0;
    }

    /// Returns the first occupied slot, or [`end`](Self::end) if the table is
    /// empty.
    ///
    /// Together with [`next_slot`](Self::next_slot), [`key_at`](Self::key_at)
    /// and [`value_at`](Self::value_at) this forms a restartable cursor over
    /// the table in bucket order:
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::new(2);
    /// table.insert(b"x", &[1, 0]).unwrap();
    /// table.insert(b"y", &[2, 0]).unwrap();
    ///
    /// let mut visited = 0;
    /// let mut slot = table.begin();
    /// while slot != table.end() {
    ///     assert!(table.key_at(slot).is_some());
    ///     assert!(table.value_at(slot).is_some());
    ///     visited += 1;
    ///     slot = table.next_slot(slot);
    /// }
    /// assert_eq!(visited, table.len());
    /// ```
    pub fn begin(&self) -> usize {
        self.first_occupied_from(0)
    }

    /// The past-the-end slot index, equal to the capacity.
    pub fn end(&self) -> usize {
        self.capacity()
    }

    /// Returns the first occupied slot after `slot`, or
    /// [`end`](Self::end) if there is none.
    pub fn next_slot(&self, slot: usize) -> usize {
        self.first_occupied_from(slot.saturating_add(1))
    }

    fn first_occupied_from(&self, start: usize) -> usize {
        self.buckets
            .get(start..)
            .and_then(|rest| rest.iter().position(Option::is_some))
            .map_or(self.end(), |offset| start + offset)
    }

    /// Returns the key stored at `slot`, or `None` if it is empty or out of
    /// range.
    pub fn key_at(&self, slot: usize) -> Option<&[u8]> {
        self.buckets
            .get(slot)?
            .as_ref()
            .map(|bucket| &*bucket.key)
    }

    /// Returns the value stored at `slot`, or `None` if it is empty or out
    /// of range.
    pub fn value_at(&self, slot: usize) -> Option<&[u8]> {
        self.buckets.get(slot)?.as_ref()?;
        Some(&self.values[value_range(self.value_size, slot)])
    }

    /// Returns an iterator over `(key, value)` pairs in bucket order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::new(1);
    /// table.insert(b"one", &[1]).unwrap();
    /// table.insert(b"two", &[2]).unwrap();
    ///
    /// let mut total = 0;
    /// for (key, value) in table.iter() {
    ///     assert!(key == b"one" || key == b"two");
    ///     total += value[0];
    /// }
    /// assert_eq!(total, 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            table: self,
            slot: self.begin(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over the keys in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in bucket order.
    pub fn values(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Removes and yields every entry as owned `(key, value)` buffers.
    ///
    /// The table keeps its capacity. If the iterator is dropped early the
    /// remaining entries are still removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::new(1);
    /// table.insert(b"a", &[1]).unwrap();
    /// table.insert(b"b", &[2]).unwrap();
    ///
    /// let drained: Vec<_> = table.drain().collect();
    /// assert_eq!(drained.len(), 2);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, S> {
        Drain {
            table: self,
            slot: 0,
        }
    }

    /// Computes a histogram of probe distances for the current table state.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();
        for slot in 0..self.capacity() {
            if let Some(distance) = self.probe_distance(slot) {
                if counts.len() <= distance {
                    counts.resize(distance + 1, 0);
                }
                counts[distance] += 1;
            }
        }
        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let slot_bytes = core::mem::size_of::<Option<Bucket>>() + self.value_size;
        let key_bytes: usize = self.keys().map(<[u8]>::len).sum();
        let capacity = self.capacity();

        DebugStats {
            populated: self.populated,
            capacity,
            value_size: self.value_size,
            load_factor: if capacity == 0 {
                0.0
            } else {
                self.populated as f64 / capacity as f64
            },
            max_probe: histogram.max_distance().unwrap_or(0),
            mean_probe: histogram.mean(),
            total_bytes: capacity * slot_bytes + key_bytes + self.carry.len(),
            wasted_bytes: (capacity - self.populated) * slot_bytes,
        }
    }
}

impl<S> HashTable<S>
where
    S: BuildHasher,
{
    /// Walks the probe sequence of `hash` looking for `key`.
    ///
    /// Entries along any probe sequence are ordered by displacement, so the
    /// walk stops at the first empty slot or the first occupant that sits
    /// closer to its home than the walk has travelled.
    fn find_slot(&self, hash: u32, key: &[u8]) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let capacity = self.capacity();
        let mut pos = home_slot(hash, capacity);
        for probe in 0..capacity {
            let bucket = self.buckets[pos].as_ref()?;
            if probe > displacement(bucket.hash, pos, capacity) {
                return None;
            }
            if bucket.hash == hash && *bucket.key == *key {
                return Some(pos);
            }
            pos = (pos + 1) % capacity;
        }

        None
    }

    /// Returns the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::new(4);
    /// table.insert(b"@_[+]/", &0xdead_beefu32.to_le_bytes()).unwrap();
    ///
    /// assert_eq!(table.get(b"@_[+]/"), Some(&0xdead_beefu32.to_le_bytes()[..]));
    /// assert_eq!(table.get(b"@_[+]"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let slot = self.find_slot(hash_key(&self.hash_builder, key), key)?;
        Some(&self.values[value_range(self.value_size, slot)])
    }

    /// Returns the value stored for `key` for in-place modification.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::new(1);
    /// table.insert(b"counter", &[0]).unwrap();
    /// if let Some(value) = table.get_mut(b"counter") {
    ///     value[0] += 1;
    /// }
    /// assert_eq!(table.get(b"counter"), Some(&[1][..]));
    /// ```
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        let slot = self.find_slot(hash_key(&self.hash_builder, key), key)?;
        Some(&mut self.values[value_range(self.value_size, slot)])
    }

    /// Returns `true` if the table holds an entry for `key`.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.find_slot(hash_key(&self.hash_builder, key), key)
            .is_some()
    }

    /// Inserts a copy of `key` with a copy of `value`, returning the stored
    /// value bytes.
    ///
    /// Fails without modifying the table if `value` is not exactly
    /// [`value_size`](Self::value_size) bytes, if `key` is already present,
    /// or if storage for the key or for growth cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    /// use robin_hash::TableError;
    ///
    /// let mut table = HashTable::new(2);
    /// table.insert(b"entry #00", &[0, 0]).unwrap();
    ///
    /// assert_eq!(table.insert(b"entry #00", &[1, 1]), Err(TableError::DuplicateKey));
    /// assert_eq!(
    ///     table.insert(b"entry #01", &[1]),
    ///     Err(TableError::ValueSize { expected: 2, found: 1 })
    /// );
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<&mut [u8], TableError> {
        if value.len() != self.value_size {
            return Err(TableError::ValueSize {
                expected: self.value_size,
                found: value.len(),
            });
        }

        let hash = hash_key(&self.hash_builder, key);
        if self.find_slot(hash, key).is_some() {
            return Err(TableError::DuplicateKey);
        }

        // Everything fallible happens before the first slot is touched.
        let key = try_copy_key(key)?;
        if self.populated == self.capacity() {
            self.grow()?;
        }

        self.carry.copy_from_slice(value);
        let (slot, distance) = robin_hood_place(
            &mut self.buckets,
            &mut self.values,
            self.value_size,
            Bucket { hash, key },
            &mut self.carry,
        );
        self.populated += 1;

        if distance > 0 {
            tracing::trace!(slot, distance, "inserted displaced entry");
        }

        Ok(&mut self.values[value_range(self.value_size, slot)])
    }

    /// Removes the entry for `key`.
    ///
    /// Later members of the probe chain are shifted back one slot each until
    /// an empty slot or an entry already at its home is reached, so no
    /// tombstone is left behind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    /// use robin_hash::TableError;
    ///
    /// let mut table = HashTable::new(1);
    /// table.insert(b"entry #02", &[2]).unwrap();
    ///
    /// assert_eq!(table.remove(b"entry #02"), Ok(()));
    /// assert_eq!(table.remove(b"entry #02"), Err(TableError::KeyNotFound));
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> Result<(), TableError> {
        let hash = hash_key(&self.hash_builder, key);
        let mut pos = self
            .find_slot(hash, key)
            .ok_or(TableError::KeyNotFound)?;

        let capacity = self.capacity();
        let mut shifts = 0usize;
        for _ in 1..capacity {
            let next = (pos + 1) % capacity;
            match &self.buckets[next] {
                Some(bucket) if displacement(bucket.hash, next, capacity) > 0 => {}
                _ => break,
            }

            // The removed bucket rides forward while `next` moves home-ward.
            self.buckets.swap(pos, next);
            self.values.copy_within(
                value_range(self.value_size, next),
                pos * self.value_size,
            );
            pos = next;
            shifts += 1;
        }

        self.buckets[pos] = None;
        self.values[value_range(self.value_size, pos)].fill(0);
        self.populated -= 1;

        tracing::trace!(shifts, "removed entry");
        Ok(())
    }

    /// Grows the table until it has room for `additional` more entries
    /// without further growth.
    ///
    /// Capacity doubles one or more times, matching what repeated insertion
    /// would do.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(8, 0);
    /// table.reserve(100).unwrap();
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<(), TableError> {
        let required = self
            .populated
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow)?;
        if required <= self.capacity() {
            return Ok(());
        }

        let mut new_capacity = self.capacity().max(MIN_NONZERO_CAPACITY);
        while new_capacity < required {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow)?;
        }
        self.rehash_into(new_capacity)
    }

    #[cold]
    fn grow(&mut self) -> Result<(), TableError> {
        let new_capacity = match self.capacity() {
            0 => MIN_NONZERO_CAPACITY,
            capacity => capacity
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow)?,
        };
        self.rehash_into(new_capacity)
    }

    /// Moves every entry into freshly allocated storage of `new_capacity`
    /// slots. On allocation failure the table is left untouched.
    fn rehash_into(&mut self, new_capacity: usize) -> Result<(), TableError> {
        debug_assert!(new_capacity >= self.populated);

        let (buckets, values) = try_alloc_slots(new_capacity, self.value_size)?;
        let old_buckets = core::mem::replace(&mut self.buckets, buckets);
        let mut old_values = core::mem::replace(&mut self.values, values);
        let old_capacity = old_buckets.len();

        for (slot, bucket) in old_buckets.into_iter().enumerate() {
            if let Some(bucket) = bucket {
                // The old value array is discarded afterwards, so it doubles
                // as the carry buffer.
                robin_hood_place(
                    &mut self.buckets,
                    &mut self.values,
                    self.value_size,
                    bucket,
                    &mut old_values[value_range(self.value_size, slot)],
                );
            }
        }

        tracing::debug!(
            old_capacity,
            new_capacity,
            populated = self.populated,
            "grew hash table"
        );
        Ok(())
    }
}

/// An iterator over the `(key, value)` pairs of a [`HashTable`].
///
/// This struct is created by [`HashTable::iter`].
pub struct Iter<'a, S> {
    table: &'a HashTable<S>,
    slot: usize,
    remaining: usize,
}

impl<'a, S> Iterator for Iter<'a, S> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        let key = table.key_at(self.slot)?;
        let value = table.value_at(self.slot)?;
        self.slot = table.next_slot(self.slot);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S> ExactSizeIterator for Iter<'_, S> {}

impl<'a, S> IntoIterator for &'a HashTable<S> {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by [`HashTable::drain`]. Entries are taken out
/// without backward shifting, so the table is only consistent again once
/// the iterator has been dropped. Leaking it leaves the remaining entries in
/// place but possibly unreachable by lookup.
pub struct Drain<'a, S> {
    table: &'a mut HashTable<S>,
    slot: usize,
}

impl<S> Iterator for Drain<'_, S> {
    type Item = (Box<[u8]>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        let value_size = self.table.value_size;
        while self.slot < self.table.capacity() {
            let slot = self.slot;
            self.slot += 1;

            if let Some(bucket) = self.table.buckets[slot].take() {
                self.table.populated -= 1;
                let range = value_range(value_size, slot);
                let value = self.table.values[range.clone()].to_vec();
                self.table.values[range].fill(0);
                return Some((bucket.key, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<S> Drop for Drain<'_, S> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}
