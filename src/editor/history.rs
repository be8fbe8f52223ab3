// SPDX-License-Identifier: MPL-2.0
//! Bounded undo/redo stacks of edit snapshots.

use crate::config::DEFAULT_HISTORY_DEPTH;
use crate::domain::editing::{Brightness, Contrast, RotationDegrees};
use crate::media::{FilterKind, RasterImage};
use std::collections::VecDeque;
use std::mem;

/// Working raster together with the display state that produced it.
///
/// Undo and redo swap whole snapshots so the reported rotation, flips,
/// filter and sliders always describe the raster on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSnapshot {
    pub raster: RasterImage,
    pub rotation: RotationDegrees,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub filter: FilterKind,
    pub brightness: Brightness,
    pub contrast: Contrast,
}

impl EditSnapshot {
    /// Snapshot of an untouched raster.
    #[must_use]
    pub fn pristine(raster: RasterImage) -> Self {
        Self {
            raster,
            rotation: RotationDegrees::default(),
            flip_horizontal: false,
            flip_vertical: false,
            filter: FilterKind::None,
            brightness: Brightness::default(),
            contrast: Contrast::default(),
        }
    }
}

/// Undo/redo stacks holding at most `depth` entries each.
///
/// Pushing beyond the depth drops the oldest entry. Recording a new edit
/// empties the redo stack.
#[derive(Debug, Clone)]
pub struct HistoryStack<T = EditSnapshot> {
    undo: VecDeque<T>,
    redo: VecDeque<T>,
    depth: usize,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl<T> HistoryStack<T> {
    /// Creates empty stacks. A depth of zero is treated as one.
    #[must_use]
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            undo: VecDeque::with_capacity(depth + 1),
            redo: VecDeque::with_capacity(depth + 1),
            depth,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Stores `snapshot` as the newest undo entry.
    pub fn push(&mut self, snapshot: T) {
        push_bounded(&mut self.undo, snapshot, self.depth);
        self.redo.clear();
    }

    /// Swaps `current` with the newest undo entry.
    ///
    /// Returns `false` and leaves `current` untouched when there is nothing
    /// to undo.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let replaced = mem::replace(current, previous);
        push_bounded(&mut self.redo, replaced, self.depth);
        true
    }

    /// Mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.redo.pop_back() else {
            return false;
        };
        let replaced = mem::replace(current, next);
        push_bounded(&mut self.undo, replaced, self.depth);
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T: Clone> HistoryStack<T> {
    /// Like [`push`](Self::push) for a borrowed snapshot.
    pub fn record(&mut self, snapshot: &T) {
        self.push(snapshot.clone());
    }
}

fn push_bounded<T>(stack: &mut VecDeque<T>, snapshot: T, depth: usize) {
    stack.push_back(snapshot);
    while stack.len() > depth {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shade(value: u8) -> RasterImage {
        RasterImage::filled(2, 2, [value, value, value, 255])
    }

    #[test]
    fn undo_on_empty_stack_is_refused() {
        let mut history = HistoryStack::<RasterImage>::default();
        let mut current = shade(1);
        assert!(!history.undo(&mut current));
        assert!(!history.redo(&mut current));
        assert_eq!(current, shade(1));
    }

    #[test]
    fn undo_then_redo_swaps_snapshots() {
        let mut history = HistoryStack::default();
        let mut current = shade(1);
        history.record(&current);
        current = shade(2);

        assert!(history.undo(&mut current));
        assert_eq!(current, shade(1));
        assert!(history.can_redo());

        assert!(history.redo(&mut current));
        assert_eq!(current, shade(2));
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn oldest_snapshot_is_evicted_at_depth() {
        let mut history = HistoryStack::new(10);
        let mut current = shade(0);
        for value in 1..=11u8 {
            history.record(&current);
            current = shade(value);
        }
        assert_eq!(history.undo_len(), 10);

        let mut undone = 0;
        while history.undo(&mut current) {
            undone += 1;
        }
        assert_eq!(undone, 10);
        // Snapshot 0 was evicted; the oldest reachable state is 1.
        assert_eq!(current, shade(1));
    }

    #[test]
    fn recording_clears_redo() {
        let mut history = HistoryStack::default();
        let mut current = shade(1);
        history.record(&current);
        current = shade(2);
        assert!(history.undo(&mut current));
        assert_eq!(history.redo_len(), 1);

        history.record(&current);
        assert_eq!(history.redo_len(), 0);
        assert!(!history.redo(&mut current));
    }

    #[test]
    fn redo_stack_is_bounded_too() {
        let mut history = HistoryStack::new(2);
        let mut current = shade(0);
        for value in 1..=2u8 {
            history.record(&current);
            current = shade(value);
        }
        while history.undo(&mut current) {}
        assert_eq!(history.redo_len(), 2);
        assert_eq!(current, shade(0));
    }

    #[test]
    fn zero_depth_keeps_one_snapshot() {
        let history = HistoryStack::<RasterImage>::new(0);
        assert_eq!(history.depth(), 1);
    }
}
