use std::collections::VecDeque;

use crate::engine::item::PlacedItem;

/// One horizontal band of the surface. Items are stored oldest first, which is also their
/// left-to-right order on screen.
#[derive(Debug, Default)]
pub struct Lane {
    items: VecDeque<PlacedItem>,
}

impl Lane {
    /// Most recently admitted item (the rightmost one).
    pub fn newest(&self) -> Option<&PlacedItem> {
        self.items.back()
    }

    /// Items oldest first.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &PlacedItem> {
        self.items.iter()
    }

    /// Number of placed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when no item is placed in this lane.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pixels between the surface's right edge and the newest item's right edge.
    ///
    /// `None` for an empty lane, which accepts any item.
    pub fn free_space(&self, surface_width: f64) -> Option<f64> {
        self.newest().map(|last| surface_width - last.right_edge())
    }

    /// Append a newly placed item behind the current newest one.
    ///
    /// Panics if the item would sit closer than `spacing` to its predecessor; the scheduler only
    /// admits items into lanes with enough free space, so this is a scheduler bug.
    pub(crate) fn admit(&mut self, item: PlacedItem, spacing: f64) {
        if let Some(last) = self.newest() {
            let gap = item.position() - last.right_edge();
            assert!(
                gap >= spacing,
                "lane admission broke spacing: gap {gap} < {spacing}"
            );
        }
        self.items.push_back(item);
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut PlacedItem> {
        self.items.iter_mut()
    }

    /// Drop every item that has fully exited, keeping survivors in order.
    pub(crate) fn prune_exited(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.has_exited());
        before - self.items.len()
    }
}

/// Fixed set of lanes addressed by index, top to bottom.
#[derive(Debug, Default)]
pub struct LaneSet {
    lanes: Vec<Lane>,
}

impl LaneSet {
    /// Create `count` empty lanes.
    pub fn new(count: usize) -> Self {
        Self {
            lanes: (0..count).map(|_| Lane::default()).collect(),
        }
    }

    /// Number of lanes.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// `true` when the set has no lanes (session metrics not established yet).
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Lane at `index`.
    pub fn get(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// Lanes top to bottom.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Lane> {
        self.lanes.iter()
    }

    /// Total placed items across all lanes.
    pub fn placed(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }

    /// `true` when every lane is empty.
    pub fn all_empty(&self) -> bool {
        self.lanes.iter().all(Lane::is_empty)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Lane> {
        self.lanes.iter_mut()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/lane.rs"]
mod tests;
