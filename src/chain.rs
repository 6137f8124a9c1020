//! Singly-linked bucket chains for [`ChainingMap`](crate::ChainingMap).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

/// One key/value pair linked into a [`Chain`].
#[derive(Debug)]
pub struct Node<V> {
    key: String,
    value: V,
    next: Option<Box<Node<V>>>,
}

impl<V> Node<V> {
    /// The node's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node's value.
    pub fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// The following node in the chain, if any.
    pub fn next(&self) -> Option<&Node<V>> {
        self.next.as_deref()
    }
}

/// A forward-only linked list of [`Node`]s.
///
/// New nodes are linked in at the head.
pub struct Chain<V> {
    head: Option<Box<Node<V>>>,
    len: usize,
}

impl<V> Chain<V> {
    pub(crate) const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of nodes in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain has no nodes.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// First node of the chain.
    pub fn head(&self) -> Option<&Node<V>> {
        self.head.as_deref()
    }

    /// Finds the node holding `key`.
    pub fn find(&self, key: &str) -> Option<&Node<V>> {
        self.iter().find(|node| node.key == key)
    }

    pub(crate) fn find_mut(&mut self, key: &str) -> Option<&mut Node<V>> {
        let mut current = self.head.as_deref_mut();
        while let Some(node) = current {
            if node.key == key {
                return Some(node);
            }
            current = node.next.as_deref_mut();
        }
        None
    }

    /// Links a new node in at the head. The caller checks that `key` is not
    /// already present.
    pub(crate) fn insert(&mut self, key: String, value: V) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
        self.len += 1;
    }

    /// Unlinks the node holding `key` and returns its value.
    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| node.key != key) {
            if let Some(node) = link {
                link = &mut node.next;
            }
        }

        let Node { value, next, .. } = *link.take()?;
        *link = next;
        self.len -= 1;
        Some(value)
    }

    /// Iterates over the nodes from the head.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            current: self.head.as_deref(),
        }
    }

    /// Unlinks every node, yielding the owned pairs from the head.
    pub(crate) fn into_pairs(mut self) -> IntoPairs<V> {
        IntoPairs {
            current: self.head.take(),
        }
    }
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for Chain<V> {
    fn clone(&self) -> Self {
        let nodes: Vec<&Node<V>> = self.iter().collect();
        let mut chain = Chain::new();
        for node in nodes.into_iter().rev() {
            chain.insert(node.key.clone(), node.value.clone());
        }
        chain
    }
}

impl<V> Drop for Chain<V> {
    fn drop(&mut self) {
        // Unlink iteratively; the default recursive drop can overflow the
        // stack on a long chain.
        let mut current = self.head.take();
        while let Some(mut node) = current {
            current = node.next.take();
        }
    }
}

/// Prints `-> (key: value)` for each node, or nothing for an empty chain.
impl<V: fmt::Display> fmt::Display for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for node in self {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "-> ({}: {})", node.key, node.value)?;
            first = false;
        }
        Ok(())
    }
}

impl<V: fmt::Debug> fmt::Debug for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|node| (&node.key, &node.value)))
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a Chain<V> {
    type Item = &'a Node<V>;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over the nodes of a [`Chain`].
pub struct Iter<'a, V> {
    current: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(node)
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

pub(crate) struct IntoPairs<V> {
    current: Option<Box<Node<V>>>,
}

impl<V> Iterator for IntoPairs<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current.take()?;
        let Node { key, value, next } = *node;
        self.current = next;
        Some((key, value))
    }
}

impl<V> Drop for IntoPairs<V> {
    fn drop(&mut self) {
        for _ in self {}
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::ToString;

    use super::*;

    fn chain_of(pairs: &[(&str, i32)]) -> Chain<i32> {
        let mut chain = Chain::new();
        for &(key, value) in pairs {
            chain.insert(key.to_string(), value);
        }
        chain
    }

    fn keys(chain: &Chain<i32>) -> Vec<&str> {
        chain.iter().map(Node::key).collect()
    }

    #[test]
    fn insert_links_at_head() {
        let chain = chain_of(&[("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(chain.len(), 3);
        assert_eq!(keys(&chain), ["c", "b", "a"]);
        assert_eq!(chain.head().map(Node::key), Some("c"));
        assert_eq!(chain.head().and_then(Node::next).map(Node::value), Some(&2));
    }

    #[test]
    fn find_and_find_mut() {
        let mut chain = chain_of(&[("a", 1), ("b", 2)]);
        assert_eq!(chain.find("a").map(Node::value), Some(&1));
        assert!(chain.find("z").is_none());

        if let Some(node) = chain.find_mut("a") {
            node.value = 10;
        }
        assert_eq!(chain.find("a").map(Node::value), Some(&10));
    }

    #[test]
    fn remove_head_middle_and_tail() {
        let mut chain = chain_of(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);

        assert_eq!(chain.remove("b"), Some(2));
        assert_eq!(keys(&chain), ["d", "c", "a"]);
        assert_eq!(chain.remove("d"), Some(4));
        assert_eq!(keys(&chain), ["c", "a"]);
        assert_eq!(chain.remove("a"), Some(1));
        assert_eq!(keys(&chain), ["c"]);
        assert_eq!(chain.remove("missing"), None);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.remove("c"), Some(3));
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn into_pairs_yields_everything() {
        let chain = chain_of(&[("a", 1), ("b", 2)]);
        let pairs: Vec<(String, i32)> = chain.into_pairs().collect();
        assert_eq!(pairs, [("b".to_string(), 2), ("a".to_string(), 1)]);
    }

    #[test]
    fn display_lists_nodes() {
        let chain = chain_of(&[("a", 1), ("b", 2)]);
        assert_eq!(format!("{}", chain), "-> (b: 2) -> (a: 1)");
        assert_eq!(format!("{}", Chain::<i32>::new()), "");
    }

    #[test]
    fn clone_preserves_order() {
        let chain = chain_of(&[("a", 1), ("b", 2), ("c", 3)]);
        let copy = chain.clone();
        assert_eq!(keys(&copy), keys(&chain));
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn long_chain_drops_without_recursion() {
        let mut chain = Chain::new();
        for i in 0..200_000 {
            chain.insert(format!("k{}", i), i);
        }
        assert_eq!(chain.len(), 200_000);
        drop(chain);
    }
}
