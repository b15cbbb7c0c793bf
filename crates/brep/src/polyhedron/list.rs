//! Circular entity list on top of a `SlotMap`.
//!
//! Purpose
//! - Own the kernel's entities (vertices, edges, faces, half-edges) under
//!   typed `slotmap` keys, so a key to a removed entity is detected as stale
//!   instead of aliasing whatever reuses its slot.
//! - Thread the live entries on a ring, giving the "next entity" order that
//!   edge collapse and healing continue from.
//!
//! Invariants
//! - Every live key is on exactly one ring of length `len()`, entered at
//!   `head`.

use std::ops::{Index, IndexMut};

use slotmap::{Key, SlotMap};

#[derive(Clone, Debug)]
struct Node<K, T> {
    value: T,
    prev: K,
    next: K,
}

/// Ring-ordered slot map.
#[derive(Clone, Debug)]
pub struct List<K: Key, T> {
    nodes: SlotMap<K, Node<K, T>>,
    head: Option<K>,
}

impl<K: Key, T> Default for List<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, T> List<K, T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a value (before the head in ring order).
    pub fn push_back(&mut self, value: T) -> K {
        self.push_back_with(|_| value)
    }

    /// Appends a value built from its own key, for self-referencing nodes.
    pub fn push_back_with<F: FnOnce(K) -> T>(&mut self, make: F) -> K {
        let key = self.nodes.insert_with_key(|k| Node {
            value: make(k),
            prev: k,
            next: k,
        });
        match self.head {
            None => self.head = Some(key),
            Some(head) => {
                let tail = self.nodes[head].prev;
                self.nodes[key].prev = tail;
                self.nodes[key].next = head;
                self.nodes[tail].next = key;
                self.nodes[head].prev = key;
            }
        }
        key
    }

    /// Unlinks and returns the value; `None` for a stale key.
    pub fn remove(&mut self, key: K) -> Option<T> {
        let node = self.nodes.remove(key)?;
        if self.nodes.is_empty() {
            self.head = None;
        } else {
            self.nodes[node.prev].next = node.next;
            self.nodes[node.next].prev = node.prev;
            if self.head == Some(key) {
                self.head = Some(node.next);
            }
        }
        Some(node.value)
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.nodes.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.nodes.get(key).map(|n| &n.value)
    }

    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.nodes.get_mut(key).map(|n| &mut n.value)
    }

    #[inline]
    pub fn front(&self) -> Option<K> {
        self.head
    }

    /// Successor in ring order (wraps around).
    #[inline]
    pub fn next(&self, key: K) -> K {
        self.live(key).next
    }

    /// Predecessor in ring order (wraps around).
    #[inline]
    pub fn prev(&self, key: K) -> K {
        self.live(key).prev
    }

    /// Entries in ring order starting at the head.
    pub fn iter(&self) -> Iter<'_, K, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Snapshot of all keys in ring order, for loops that mutate the list.
    pub fn handles(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Removes every entry; outstanding keys become stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
    }

    #[inline]
    fn live(&self, key: K) -> &Node<K, T> {
        match self.nodes.get(key) {
            Some(node) => node,
            None => panic!("stale list key {key:?}"),
        }
    }
}

impl<K: Key, T> Index<K> for List<K, T> {
    type Output = T;

    #[inline]
    fn index(&self, key: K) -> &T {
        &self.live(key).value
    }
}

impl<K: Key, T> IndexMut<K> for List<K, T> {
    #[inline]
    fn index_mut(&mut self, key: K) -> &mut T {
        match self.get_mut(key) {
            Some(v) => v,
            None => panic!("stale list key {key:?}"),
        }
    }
}

/// Ring-order iterator over `(key, &value)`.
pub struct Iter<'a, K: Key, T> {
    list: &'a List<K, T>,
    cursor: Option<K>,
    remaining: usize,
}

impl<'a, K: Key, T> Iterator for Iter<'a, K, T> {
    type Item = (K, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.cursor?;
        let node = self.list.live(key);
        self.remaining -= 1;
        self.cursor = Some(node.next);
        Some((key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Key, T> ExactSizeIterator for Iter<'_, K, T> {}
