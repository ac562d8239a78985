// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;

/// Selected cell indices plus the anchor of the most recent plain click.
///
/// Indices are 0-based and row-major. The anchor is set by a plain click and
/// read, never cleared, by later range and rectangle selections; it survives
/// until the next plain click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Plain click: the selection collapses to `index` and the anchor moves.
    pub fn select_only(&mut self, index: usize) {
        self.selected.clear();
        self.selected.insert(index);
        self.anchor = Some(index);
    }

    /// Ctrl click: membership toggle for `index` alone.
    pub fn toggle(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Range/rectangle click: the selection is rebuilt from `indices`; the
    /// anchor stays where the last plain click put it.
    pub fn replace(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selected.clear();
        self.selected.extend(indices);
    }
}
