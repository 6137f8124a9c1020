use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use core::mem;

use crate::DEFAULT_CAPACITY;
use crate::hash::DefaultHashBuilder;
use crate::hash::hash_key;
use crate::prime::next_prime;
use crate::prime::normalize_capacity;

/// `put` grows the table first when the load factor has reached this value.
const MAX_LOAD_FACTOR: f64 = 0.5;

#[derive(Clone, Debug)]
struct Entry<V> {
    key: String,
    value: V,
}

/// State of one bucket.
///
/// A tombstone keeps the key of a removed entry so that probe walks passing
/// through it continue, and so that a later `put` of the same key revives the
/// slot in place.
#[derive(Clone, Debug, Default)]
enum Slot<V> {
    #[default]
    Empty,
    Occupied(Entry<V>),
    Tombstone(String),
}

fn empty_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Quadratic probe positions `home + j² (mod capacity)` for `j` in
/// `0..capacity`.
///
/// Consecutive squares differ by `2j + 1`, so the walk never has to compute
/// `j²` itself and cannot overflow.
struct ProbeSeq {
    index: usize,
    step: usize,
    capacity: usize,
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.step >= self.capacity {
            return None;
        }
        let current = self.index;
        self.step += 1;
        self.index = (self.index + 2 * self.step - 1) % self.capacity;
        Some(current)
    }
}

/// A string-keyed hash map using open addressing with quadratic probing.
///
/// The bucket array always has a prime length. Each bucket is empty, holds
/// one live entry, or holds a tombstone left behind by [`remove`]. Tombstones
/// keep probe walks intact and are only reclaimed when the table is rebuilt
/// by [`resize_table`] or [`clear`].
///
/// [`put`] doubles the table *before* inserting whenever the current load
/// factor is at least 0.5, so probe walks stay short and always reach a free
/// bucket.
///
/// # Examples
///
/// ```rust
/// use prime_probe::OpenAddressingMap;
///
/// let mut map = OpenAddressingMap::with_capacity(23);
/// map.put("key1", 10);
/// assert_eq!(map.get("key1"), Some(&10));
///
/// map.resize_table(30);
/// assert_eq!(map.capacity(), 31);
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get("key1"), Some(&10));
/// ```
///
/// [`put`]: OpenAddressingMap::put
/// [`remove`]: OpenAddressingMap::remove
/// [`resize_table`]: OpenAddressingMap::resize_table
/// [`clear`]: OpenAddressingMap::clear
#[derive(Clone)]
pub struct OpenAddressingMap<V, S = DefaultHashBuilder> {
    slots: Box<[Slot<V>]>,
    len: usize,
    hash_builder: S,
}

impl<V> OpenAddressingMap<V> {
    /// Creates an empty map with the default capacity of 11 buckets and the
    /// default hasher.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with at least `capacity` buckets.
    ///
    /// The bucket count is rounded up to a prime; an even request is first
    /// bumped to the next odd number.
    ///
    /// ```rust
    /// use prime_probe::OpenAddressingMap;
    ///
    /// let map: OpenAddressingMap<u32> = OpenAddressingMap::with_capacity(20);
    /// assert_eq!(map.capacity(), 23);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<V, S> OpenAddressingMap<V, S> {
    /// Creates an empty map with the default capacity and the given hasher
    /// builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hash_builder)
    }

    /// Creates an empty map with at least `capacity` buckets and the given
    /// hasher builder.
    ///
    /// ```rust
    /// use prime_probe::OpenAddressingMap;
    /// use prime_probe::hash::PositionalHash;
    ///
    /// let map: OpenAddressingMap<u32, _> =
    ///     OpenAddressingMap::with_capacity_and_hasher(0, PositionalHash);
    /// assert_eq!(map.capacity(), 3);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            slots: empty_slots(next_prime(capacity)),
            len: 0,
            hash_builder,
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets. Always prime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the hasher builder the map was constructed with.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the current load factor, `len / capacity`.
    pub fn table_load(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Returns the number of buckets without a live entry.
    ///
    /// Tombstoned buckets count as empty here even though probe walks still
    /// step over them.
    ///
    /// ```rust
    /// use prime_probe::OpenAddressingMap;
    ///
    /// let mut map = OpenAddressingMap::with_capacity(101);
    /// map.put("key1", 10);
    /// map.put("key2", 20);
    /// assert_eq!(map.empty_buckets(), 99);
    ///
    /// map.remove("key1");
    /// assert_eq!(map.empty_buckets(), 100);
    /// ```
    pub fn empty_buckets(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Empty | Slot::Tombstone(_)))
            .count()
    }

    /// Removes every entry and tombstone. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots = empty_slots(self.capacity());
        self.len = 0;
    }

    /// Returns an iterator over the live entries in bucket order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys of the live entries.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values of the live entries.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an owned copy of every live key/value pair, in bucket order.
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (String::from(key), value.clone()))
            .collect()
    }
}

impl<V, S> OpenAddressingMap<V, S>
where
    S: BuildHasher,
{
    fn probe_seq(&self, key: &str) -> ProbeSeq {
        let capacity = self.capacity();
        ProbeSeq {
            index: (hash_key(&self.hash_builder, key) % capacity as u64) as usize,
            step: 0,
            capacity,
        }
    }

    /// Index of the live entry for `key`.
    ///
    /// The walk ends at the first empty bucket or at a tombstone of the same
    /// key, since `put` always revives that tombstone before looking further.
    fn find_index(&self, key: &str) -> Option<usize> {
        for index in self.probe_seq(key) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.key == key => return Some(index),
                Slot::Tombstone(dead) if dead == key => return None,
                Slot::Occupied(_) | Slot::Tombstone(_) => {}
            }
        }
        None
    }

    /// Bucket `put` should write `key` into.
    ///
    /// Returns the live entry or tombstone for `key` if the walk meets one,
    /// otherwise the first empty bucket. When tombstones of other keys fill
    /// the whole walk, the first of them is claimed instead. `None` means the
    /// walk found neither.
    fn insert_index(&self, key: &str) -> Option<usize> {
        let mut first_foreign_tombstone = None;
        for index in self.probe_seq(key) {
            match &self.slots[index] {
                Slot::Empty => return Some(index),
                Slot::Occupied(entry) if entry.key == key => return Some(index),
                Slot::Tombstone(dead) if dead == key => return Some(index),
                Slot::Tombstone(_) => {
                    first_foreign_tombstone.get_or_insert(index);
                }
                Slot::Occupied(_) => {}
            }
        }
        first_foreign_tombstone
    }

    /// Inserts or updates the value for `key`.
    ///
    /// If the load factor is already 0.5 or more the table is first resized
    /// to twice its capacity. Returns the previous value when `key` was live.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use prime_probe::OpenAddressingMap;
    ///
    /// let mut map = OpenAddressingMap::with_capacity(11);
    /// for i in 0..150 {
    ///     map.put(format!("key{}", i), i * 100);
    /// }
    /// assert_eq!(map.len(), 150);
    /// assert_eq!(map.capacity(), 397);
    ///
    /// assert_eq!(map.put("key7", 1), Some(700));
    /// assert_eq!(map.len(), 150);
    /// ```
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        if self.table_load() >= MAX_LOAD_FACTOR {
            self.resize_table(self.capacity() * 2);
        }

        let key = key.into();
        match self.insert_index(&key) {
            Some(index) => match &mut self.slots[index] {
                Slot::Occupied(entry) => Some(mem::replace(&mut entry.value, value)),
                slot => {
                    *slot = Slot::Occupied(Entry { key, value });
                    self.len += 1;
                    None
                }
            },
            None => {
                self.resize_table(self.capacity() * 2);
                self.put(key, value)
            }
        }
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        let index = self.find_index(key)?;
        match &self.slots[index] {
            Slot::Occupied(entry) => Some(&entry.value),
            Slot::Empty | Slot::Tombstone(_) => None,
        }
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find_index(key)?;
        match &mut self.slots[index] {
            Slot::Occupied(entry) => Some(&mut entry.value),
            Slot::Empty | Slot::Tombstone(_) => None,
        }
    }

    /// Returns `true` if `key` has a live entry. Always `false` on an empty
    /// map.
    pub fn contains_key(&self, key: &str) -> bool {
        !self.is_empty() && self.get(key).is_some()
    }

    /// Removes `key`, leaving a tombstone in its bucket, and returns its
    /// value. Does nothing if `key` is absent.
    ///
    /// ```rust
    /// use prime_probe::OpenAddressingMap;
    ///
    /// let mut map = OpenAddressingMap::new();
    /// map.put("a", 1);
    /// assert_eq!(map.remove("a"), Some(1));
    /// assert_eq!(map.remove("a"), None);
    /// assert!(!map.contains_key("a"));
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find_index(key)?;
        match mem::take(&mut self.slots[index]) {
            Slot::Occupied(Entry { key, value }) => {
                self.slots[index] = Slot::Tombstone(key);
                self.len -= 1;
                Some(value)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Rebuilds the table with `new_capacity` buckets, rounded up to a prime.
    ///
    /// Every live entry is rehashed into the new bucket array and tombstones
    /// are dropped. A request smaller than [`len`](Self::len) is ignored and
    /// returns `false`.
    ///
    /// Re-insertion goes through [`put`](Self::put), so a request too small
    /// to stay under the load threshold grows again while rehashing.
    pub fn resize_table(&mut self, new_capacity: usize) -> bool {
        if new_capacity < self.len {
            return false;
        }

        let old = mem::replace(
            &mut self.slots,
            empty_slots(normalize_capacity(new_capacity)),
        );
        self.len = 0;
        for slot in old.into_vec() {
            if let Slot::Occupied(Entry { key, value }) = slot {
                self.put(key, value);
            }
        }
        true
    }

    /// Returns how many live entries sit at each probe distance `j` from
    /// their home bucket.
    ///
    /// Compiled under `cfg(test)` or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::stats::Histogram {
        let mut hist = crate::stats::Histogram::new("probe distance");
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(entry) = slot
                && let Some(distance) = self.probe_seq(&entry.key).position(|i| i == index)
            {
                hist.record(distance);
            }
        }
        hist
    }

    /// Returns bucket utilization statistics.
    ///
    /// Compiled under `cfg(test)` or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::stats::TableStats {
        let tombstones = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Tombstone(_)))
            .count();
        crate::stats::TableStats {
            populated: self.len,
            capacity: self.capacity(),
            empty_buckets: self.empty_buckets(),
            tombstones,
            load_factor: self.table_load(),
            longest_run: self.probe_histogram().bins().len().saturating_sub(1),
        }
    }
}

impl<V, S> Default for OpenAddressingMap<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<V, S> Debug for OpenAddressingMap<V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Dumps every bucket on its own line as `index: contents`.
impl<V, S> Display for OpenAddressingMap<V, S>
where
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{}: None", index)?,
                Slot::Occupied(entry) => {
                    writeln!(f, "{}: K: {} V: {} TS: false", index, entry.key, entry.value)?
                }
                Slot::Tombstone(key) => writeln!(f, "{}: K: {} TS: true", index, key)?,
            }
        }
        Ok(())
    }
}

impl<K, V, S> Extend<(K, V)> for OpenAddressingMap<V, S>
where
    K: Into<String>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OpenAddressingMap<V, S>
where
    K: Into<String>,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, V, S> IntoIterator for &'a OpenAddressingMap<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the live entries of an [`OpenAddressingMap`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(entry) = slot {
                self.remaining -= 1;
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}
