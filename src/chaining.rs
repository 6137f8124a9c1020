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
use crate::chain;
use crate::chain::Chain;
use crate::hash::DefaultHashBuilder;
use crate::hash::hash_key;
use crate::prime::next_prime;
use crate::prime::normalize_capacity;

fn empty_chains<V>(capacity: usize) -> Box<[Chain<V>]> {
    (0..capacity).map(|_| Chain::new()).collect()
}

/// A string-keyed hash map using separate chaining.
///
/// Each of the prime number of buckets holds a singly-linked [`Chain`] of the
/// entries hashing to it. Unlike [`OpenAddressingMap`], the table never grows
/// on its own: chains simply get longer, and callers resize explicitly with
/// [`resize_table`].
///
/// # Examples
///
/// ```rust
/// use prime_probe::ChainingMap;
///
/// let mut map = ChainingMap::new();
/// map.put("apple", 3);
/// map.put("pear", 5);
/// assert_eq!(map.get("apple"), Some(&3));
///
/// // Chaining happily runs above a load factor of 1.
/// map.resize_table(1);
/// assert_eq!(map.capacity(), 3);
/// assert_eq!(map.get("pear"), Some(&5));
/// ```
///
/// [`OpenAddressingMap`]: crate::OpenAddressingMap
/// [`resize_table`]: ChainingMap::resize_table
pub struct ChainingMap<V, S = DefaultHashBuilder> {
    buckets: Box<[Chain<V>]>,
    len: usize,
    hash_builder: S,
}

impl<V> ChainingMap<V> {
    /// Creates an empty map with the default capacity of 11 buckets and the
    /// default hasher.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with at least `capacity` buckets, rounded up to a
    /// prime.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<V, S> ChainingMap<V, S> {
    /// Creates an empty map with the default capacity and the given hasher
    /// builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hash_builder)
    }

    /// Creates an empty map with at least `capacity` buckets and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            buckets: empty_chains(next_prime(capacity)),
            len: 0,
            hash_builder,
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets. Always prime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the bucket array.
    ///
    /// Together with [`hasher`](Self::hasher) and
    /// [`hash_key`](crate::hash::hash_key) this lets a caller inspect the
    /// chain a key lives in without a second lookup.
    ///
    /// ```rust
    /// use prime_probe::ChainingMap;
    /// use prime_probe::hash::hash_key;
    ///
    /// let mut map = ChainingMap::new();
    /// map.put("apple", 1);
    ///
    /// let bucket = hash_key(map.hasher(), "apple") % map.capacity() as u64;
    /// let node = map.buckets()[bucket as usize].find("apple");
    /// assert_eq!(node.map(|n| *n.value()), Some(1));
    /// ```
    pub fn buckets(&self) -> &[Chain<V>] {
        &self.buckets
    }

    /// Returns the hasher builder the map was constructed with.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the current load factor, `len / capacity`. May exceed 1.
    pub fn table_load(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Returns the number of buckets whose chain is empty.
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Removes every entry. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.buckets = empty_chains(self.capacity());
        self.len = 0;
    }

    /// Returns an iterator over all entries, bucket by bucket.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an owned copy of every key/value pair, bucket by bucket.
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (String::from(key), value.clone()))
            .collect()
    }
}

impl<V, S> ChainingMap<V, S>
where
    S: BuildHasher,
{
    fn bucket_index(&self, key: &str) -> usize {
        (hash_key(&self.hash_builder, key) % self.capacity() as u64) as usize
    }

    /// Inserts or updates the value for `key`, returning the previous value.
    ///
    /// Never resizes.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let index = self.bucket_index(&key);
        let chain = &mut self.buckets[index];
        if let Some(node) = chain.find_mut(&key) {
            return Some(mem::replace(node.value_mut(), value));
        }
        chain.insert(key, value);
        self.len += 1;
        None
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.bucket_index(key)]
            .find(key)
            .map(chain::Node::value)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets[index]
            .find_mut(key)
            .map(chain::Node::value_mut)
    }

    /// Returns `true` if `key` is present. Always `false` on an empty map.
    pub fn contains_key(&self, key: &str) -> bool {
        !self.is_empty() && self.buckets[self.bucket_index(key)].find(key).is_some()
    }

    /// Unlinks `key` from its chain and returns its value. Does nothing if
    /// `key` is absent.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_index(key);
        let value = self.buckets[index].remove(key)?;
        self.len -= 1;
        Some(value)
    }

    /// Rebuilds the table with `new_capacity` buckets, rounded up to a prime,
    /// and rehashes every entry into it.
    ///
    /// A request of zero is ignored and returns `false`. Requests below
    /// [`len`](Self::len) are honoured; the chains just get longer.
    pub fn resize_table(&mut self, new_capacity: usize) -> bool {
        if new_capacity < 1 {
            return false;
        }

        let old = mem::replace(
            &mut self.buckets,
            empty_chains(normalize_capacity(new_capacity)),
        );
        self.len = 0;
        for chain in old.into_vec() {
            for (key, value) in chain.into_pairs() {
                self.put(key, value);
            }
        }
        true
    }

    /// Returns how many buckets have each chain length.
    ///
    /// Compiled under `cfg(test)` or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> crate::stats::Histogram {
        let mut hist = crate::stats::Histogram::new("chain length");
        for chain in self.buckets.iter() {
            hist.record(chain.len());
        }
        hist
    }

    /// Returns bucket utilization statistics.
    ///
    /// Compiled under `cfg(test)` or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::stats::TableStats {
        crate::stats::TableStats {
            populated: self.len,
            capacity: self.capacity(),
            empty_buckets: self.empty_buckets(),
            tombstones: 0,
            load_factor: self.table_load(),
            longest_run: self.buckets.iter().map(Chain::len).max().unwrap_or(0),
        }
    }
}

impl<V, S> Clone for ChainingMap<V, S>
where
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<V, S> Default for ChainingMap<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<V, S> Debug for ChainingMap<V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Dumps every bucket on its own line as `index: chain`.
impl<V, S> Display for ChainingMap<V, S>
where
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{}: {}", index, chain)?;
        }
        Ok(())
    }
}

impl<K, V, S> Extend<(K, V)> for ChainingMap<V, S>
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

impl<K, V, S> FromIterator<(K, V)> for ChainingMap<V, S>
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

impl<'a, V, S> IntoIterator for &'a ChainingMap<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`ChainingMap`].
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Chain<V>>,
    chain: Option<chain::Iter<'a, V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((node.key(), node.value()));
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}
