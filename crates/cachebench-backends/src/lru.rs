//! Byte-bounded LRU (Least Recently Used) map
//!
//! Uses an index-linked list over a slot vector for O(1) eviction. Every
//! entry weighs `key.len() + value.len()` bytes.

use std::collections::HashMap;

use ahash::RandomState;

/// Node in the LRU doubly-linked list
struct Node {
    key: Box<[u8]>,
    value: Box<[u8]>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Node {
    fn weight(&self) -> usize {
        self.key.len() + self.value.len()
    }
}

/// What a [`LruMap::put`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Put {
    /// New entry stored
    Inserted {
        /// Entries dropped to make room
        evicted: usize,
    },
    /// Existing entry replaced
    Replaced {
        /// Entries dropped to make room
        evicted: usize,
    },
    /// Entry alone is larger than the capacity; nothing stored
    Rejected,
}

/// LRU map holding at most `capacity` bytes of keys and values
pub struct LruMap {
    map: HashMap<Box<[u8]>, usize, RandomState>,
    nodes: Vec<Option<Node>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    capacity: usize,
    used: usize,
}

impl LruMap {
    /// Create a new LRU map bounded to `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            map: HashMap::with_hasher(RandomState::new()),
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
            used: 0,
        }
    }

    /// Get a value, marking it most recently used
    pub fn get(&mut self, key: &[u8]) -> Option<&[u8]> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &*node.value)
    }

    /// Insert or replace a key-value pair
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Put {
        let weight = key.len() + value.len();
        if weight > self.capacity {
            return Put::Rejected;
        }

        if let Some(&idx) = self.map.get(key) {
            if let Some(node) = &mut self.nodes[idx] {
                self.used = self.used - node.value.len() + value.len();
                node.value = value.into();
            }
            self.move_to_front(idx);
            let evicted = self.evict_to_fit(0);
            return Put::Replaced { evicted };
        }

        let evicted = self.evict_to_fit(weight);
        let idx = self.alloc_node();
        let key: Box<[u8]> = key.into();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value: value.into(),
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.map.insert(key, idx);
        self.used += weight;
        Put::Inserted { evicted }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Bytes held by keys and values
    pub fn used_bytes(&self) -> usize {
        self.used
    }

    /// Byte capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    /// Evict from the tail until `incoming` more bytes fit
    fn evict_to_fit(&mut self, incoming: usize) -> usize {
        let mut evicted = 0;
        while self.used + incoming > self.capacity {
            let Some(tail_idx) = self.tail else {
                break;
            };
            self.unlink(tail_idx);
            if let Some(node) = self.nodes[tail_idx].take() {
                self.map.remove(&node.key);
                self.used -= node.weight();
                evicted += 1;
            }
            self.free_node(tail_idx);
        }
        evicted
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }
}
