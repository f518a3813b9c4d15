//! Arena-backed doubly linked list with stable handles.
//!
//! Nodes live in a [`SlotArena`] and link to each other by [`SlotId`], so
//! move-to-front and remove-by-handle are O(1) without raw pointers. The
//! front is the most recently used end; the back is the eviction end.
//!
//! ```text
//!   front (MRU)                                   back (LRU)
//!   head ─► [id_4] ◄──► [id_1] ◄──► [id_7] ◄── tail
//! ```
//!
//! Used for LRU ordering, ARC's T1/T2 lists and the ghost lists.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{InvariantError, ensure_invariant};

#[derive(Debug)]
struct Link<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Ordered sequence with O(1) push/pop at both ends and O(1) handle moves.
#[derive(Debug)]
pub struct OrderList<T> {
    nodes: SlotArena<Link<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> OrderList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.nodes.contains(id)
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|link| &link.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|link| &mut link.value)
    }

    /// Inserts `value` at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.nodes.insert(Link {
            value,
            prev: None,
            next: None,
        });
        self.link_front(id);
        id
    }

    /// Removes and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Unlinks `id` and returns its value; `None` for a stale handle.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.nodes.contains(id) {
            return None;
        }
        self.unlink(id);
        self.nodes.remove(id).map(|link| link.value)
    }

    /// Moves `id` to the front. Returns `false` for a stale handle.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.nodes.contains(id) {
            return false;
        }
        if self.head != Some(id) {
            self.unlink(id);
            self.link_front(id);
        }
        true
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates values from front (MRU) to back (LRU).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn link_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(link) = self.nodes.get_mut(id) {
            link.prev = None;
            link.next = old_head;
        }
        match old_head.and_then(|h| self.nodes.get_mut(h)) {
            Some(head) => head.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn unlink(&mut self, id: SlotId) {
        let Some((prev, next)) = self.nodes.get(id).map(|link| (link.prev, link.next)) else {
            return;
        };
        match prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(link) => link.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(link) => link.prev = prev,
            None => self.tail = prev,
        }
        if let Some(link) = self.nodes.get_mut(id) {
            link.prev = None;
            link.next = None;
        }
    }

    /// Walks the list front to back checking link symmetry and length.
    pub fn check_links(&self) -> Result<(), InvariantError> {
        ensure_invariant!(
            self.head.is_some() == self.tail.is_some(),
            "list head/tail disagree about emptiness"
        );
        let mut count = 0usize;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(link) = self.nodes.get(id) else {
                return Err(InvariantError::new("list links to a freed slot"));
            };
            ensure_invariant!(link.prev == prev, "broken back-link at slot {}", id.index());
            count += 1;
            ensure_invariant!(count <= self.len(), "cycle detected in list");
            prev = Some(id);
            cursor = link.next;
        }
        ensure_invariant!(self.tail == prev, "tail does not match last reachable node");
        ensure_invariant!(
            count == self.len(),
            "list reaches {} nodes but arena holds {}",
            count,
            self.len()
        );
        Ok(())
    }
}

impl<T> Default for OrderList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, T> {
    list: &'a OrderList<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.list.nodes.get(self.cursor?)?;
        self.cursor = link.next;
        Some(&link.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(list: &OrderList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    #[test]
    fn push_front_orders_newest_first() {
        let mut list = OrderList::new();
        list.push_front("a");
        list.push_front("b");
        list.push_front("c");
        assert_eq!(contents(&list), ["c", "b", "a"]);
        assert_eq!(list.back(), Some(&"a"));
        list.check_links().unwrap();
    }

    #[test]
    fn move_to_front_from_middle_and_back() {
        let mut list = OrderList::new();
        let a = list.push_front("a");
        let b = list.push_front("b");
        list.push_front("c");

        assert!(list.move_to_front(b));
        assert_eq!(contents(&list), ["b", "c", "a"]);
        assert!(list.move_to_front(a));
        assert_eq!(contents(&list), ["a", "b", "c"]);
        assert_eq!(list.back(), Some(&"c"));
        list.check_links().unwrap();
    }

    #[test]
    fn pop_back_drains_in_insertion_order() {
        let mut list = OrderList::new();
        for v in ["a", "b", "c"] {
            list.push_front(v);
        }
        assert_eq!(list.pop_back(), Some("a"));
        assert_eq!(list.pop_back(), Some("b"));
        assert_eq!(list.pop_back(), Some("c"));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());
        list.check_links().unwrap();
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut list = OrderList::new();
        let a = list.push_front("a");
        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(list.remove(a), None);
        assert!(!list.move_to_front(a));
        list.push_front("b");
        assert_eq!(list.get(a), None);
        list.check_links().unwrap();
    }

    #[test]
    fn remove_single_node_resets_ends() {
        let mut list = OrderList::new();
        let a = list.push_front("a");
        list.remove(a);
        assert_eq!(list.front_id(), None);
        assert_eq!(list.back_id(), None);
        list.check_links().unwrap();
    }
}
