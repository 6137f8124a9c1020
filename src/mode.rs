//! Most-frequent-element search over a [`ChainingMap`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::ChainingMap;
use crate::hash::hash_key;

/// Returns every element that occurs most often in `items`, together with
/// that number of occurrences.
///
/// All tied elements are returned. Their order follows the bucket layout of
/// the counting map and is not meaningful. An empty input yields no modes
/// and a frequency of zero.
///
/// # Examples
///
/// ```rust
/// use prime_probe::find_mode;
///
/// let (modes, frequency) = find_mode(&["apple", "apple", "grape", "melon", "peach"]);
/// assert_eq!(modes, ["apple"]);
/// assert_eq!(frequency, 2);
/// ```
pub fn find_mode<T: AsRef<str>>(items: &[T]) -> (Vec<String>, usize) {
    let mut counts: ChainingMap<usize> = ChainingMap::new();
    let mut max_frequency = 0;

    for item in items {
        let key = item.as_ref();
        // Read the running count straight out of the key's chain.
        let bucket = hash_key(counts.hasher(), key) % counts.capacity() as u64;
        let count = counts.buckets()[bucket as usize]
            .find(key)
            .map_or(0, |node| *node.value())
            + 1;
        counts.put(key, count);
        max_frequency = max_frequency.max(count);
    }

    let modes = counts
        .buckets()
        .iter()
        .flat_map(|chain| chain.iter())
        .filter(|node| *node.value() == max_frequency)
        .map(|node| String::from(node.key()))
        .collect();
    (modes, max_frequency)
}
