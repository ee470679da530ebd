//! # LRU Ordering
//!
//! A bounded set that remembers in which order its items were last used.
//!
//! Inserting into a full list evicts exactly one item, the least recently used,
//! and hands it back to the caller so associated data can be dropped too.
//!
//! Nodes live in an arena and link to each other by index, so insert, remove and
//! promote are all O(1) without any shared pointers.

use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Recency-ordered set with a fixed capacity.
///
/// Not synchronised; wrap it in a lock to share it between threads.
#[derive(Debug)]
pub struct LruList<T> {
    capacity: NonZeroUsize,
    index: HashMap<T, usize>,
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    /// Most recently used.
    head: Option<usize>,
    /// Least recently used.
    tail: Option<usize>,
}

impl<T> LruList<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity.get()),
            nodes: Vec::with_capacity(capacity.get()),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    /// Marks `item` as most recently used.
    ///
    /// Returns the evicted least recently used item when a new item had to make room.
    /// Re-inserting an item that is already present only promotes it.
    pub fn insert(&mut self, item: T) -> Option<T> {
        if let Some(&slot) = self.index.get(&item) {
            self.promote(slot);
            return None;
        }

        let evicted = if self.len() == self.capacity() {
            self.pop_least_recent()
        } else {
            None
        };

        let slot = self.allocate(Node {
            item: item.clone(),
            prev: None,
            next: None,
        });
        self.push_front(slot);
        self.index.insert(item, slot);

        evicted
    }

    /// Promotes `item` without inserting it. Returns whether it was present.
    pub fn touch(&mut self, item: &T) -> bool {
        match self.index.get(item) {
            Some(&slot) => {
                self.promote(slot);
                true
            }
            None => false,
        }
    }

    /// Removes `item` wherever it sits in the order. Absent items are ignored.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(slot) = self.index.remove(item) else {
            return false;
        };
        self.unlink(slot);
        self.nodes[slot] = None;
        self.free.push(slot);
        true
    }

    pub fn least_recent(&self) -> Option<&T> {
        self.tail.and_then(|slot| self.node(slot)).map(|node| &node.item)
    }

    pub fn most_recent(&self) -> Option<&T> {
        self.head.and_then(|slot| self.node(slot)).map(|node| &node.item)
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Items from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn pop_least_recent(&mut self) -> Option<T> {
        let slot = self.tail?;
        self.unlink(slot);
        let node = self.nodes[slot].take()?;
        self.index.remove(&node.item);
        self.free.push(slot);
        Some(node.item)
    }

    fn allocate(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn promote(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|head| self.node_mut(head)) {
            Some(head) => head.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let Some((prev, next)) = self.node(slot).map(|node| (node.prev, node.next)) else {
            return;
        };
        match prev.and_then(|p| self.node_mut(p)) {
            Some(node) => node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(node) => node.prev = prev,
            None => self.tail = prev,
        }
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = None;
        }
    }

    fn node(&self, slot: usize) -> Option<&Node<T>> {
        self.nodes.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<T>> {
        self.nodes.get_mut(slot).and_then(Option::as_mut)
    }
}

pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(self.cursor?)?.as_ref()?;
        self.cursor = node.next;
        Some(&node.item)
    }
}

impl<'a, T> IntoIterator for &'a LruList<T>
where
    T: Eq + Hash + Clone,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
