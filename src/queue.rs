use crate::error::NavError;
use crate::node::Screen;

/// Items a [`NavQueue`] can hold. The id is what `insert_after` and
/// `remove` match against.
pub trait QueueItem {
    fn queue_id(&self) -> &str;
}

impl<C> QueueItem for Screen<C> {
    fn queue_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
struct Queued<T> {
    item: T,
    /// Owner that front-inserted this entry, if it arrived via `insert`.
    inserted_by: Option<String>,
    /// Queue id this entry was anchored behind, if it arrived via
    /// `insert_after`.
    anchor: Option<String>,
}

/// FIFO queue of not-yet-shown descriptors with owner-relative priority
/// insertion.
///
/// `insert` places an entry ahead of everything that was merely appended,
/// but behind earlier `insert`s from the same owner, so a caller inserting
/// A then B consumes them as A, B. `insert_after` stacks behind a specific
/// queued entry the same way.
#[derive(Debug, Clone)]
pub struct NavQueue<T> {
    entries: Vec<Queued<T>>,
}

impl<T: QueueItem> Default for NavQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: QueueItem> NavQueue<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push to the tail.
    pub fn append(&mut self, item: T) {
        self.entries.push(Queued {
            item,
            inserted_by: None,
            anchor: None,
        });
    }

    /// Insert as the earliest not-yet-consumed entry attributable to
    /// `owner`, preserving the relative order of that owner's inserts.
    pub fn insert(&mut self, item: T, owner: &str) {
        let pos = self
            .entries
            .iter()
            .rposition(|entry| entry.inserted_by.as_deref() == Some(owner))
            .map_or(0, |idx| idx + 1);
        self.entries.insert(
            pos,
            Queued {
                item,
                inserted_by: Some(owner.to_string()),
                anchor: None,
            },
        );
    }

    /// Insert immediately after the queued entry `after_id`, stacking
    /// behind earlier inserts that targeted the same entry. Falls back to
    /// [`NavQueue::insert`] keyed on `fallback_owner` when `after_id` is
    /// not queued.
    pub fn insert_after(&mut self, item: T, after_id: &str, fallback_owner: &str) {
        let Some(base) = self
            .entries
            .iter()
            .position(|entry| entry.item.queue_id() == after_id)
        else {
            self.insert(item, fallback_owner);
            return;
        };

        let mut pos = base + 1;
        while pos < self.entries.len() && self.entries[pos].anchor.as_deref() == Some(after_id) {
            pos += 1;
        }
        self.entries.insert(
            pos,
            Queued {
                item,
                inserted_by: None,
                anchor: Some(after_id.to_string()),
            },
        );
    }

    /// Dequeue the head, failing when nothing is queued.
    pub fn take_next(&mut self) -> Result<T, NavError> {
        if self.entries.is_empty() {
            return Err(NavError::EmptyQueue);
        }
        Ok(self.entries.remove(0).item)
    }

    /// Drop every queued entry whose id is listed. Missing ids are ignored.
    pub fn remove(&mut self, ids: &[&str]) {
        self.entries
            .retain(|entry| !ids.contains(&entry.item.queue_id()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.item.queue_id())
            .collect()
    }
}
