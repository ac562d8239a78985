// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Mutations over the board and its selection.
//!
//! Click handling resolves one of four modes from the modifier snapshot and
//! the anchor, in strict priority order: rectangle, range, toggle, replace.
//! Board growth is the only other mutation; nothing ever removes cells.

use std::fmt;

use crate::model::{Board, ClickModifiers, Selection};

/// User-facing copy for a rejected growth count.
pub const INVALID_COUNT_MESSAGE: &str = "Please enter a valid positive integer";

/// How a click is interpreted, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// Alt with an anchor: every cell in the bounding box spanned by the
    /// anchor's and the clicked cell's row/column coordinates.
    Rectangle,
    /// Shift with an anchor: the contiguous linear index range between the
    /// anchor and the clicked cell, inclusive.
    Range,
    /// Ctrl: toggle the clicked cell, leaving the rest untouched.
    Toggle,
    /// No qualifying modifier: the clicked cell becomes the whole selection
    /// and the new anchor.
    Replace,
}

/// Resolves the click mode for a modifier snapshot.
///
/// Alt and shift only qualify once an anchor exists; without one the click
/// falls through the priority chain.
pub fn click_mode(modifiers: ClickModifiers, anchor: Option<usize>) -> ClickMode {
    if modifiers.alt && anchor.is_some() {
        ClickMode::Rectangle
    } else if modifiers.shift && anchor.is_some() {
        ClickMode::Range
    } else if modifiers.ctrl {
        ClickMode::Toggle
    } else {
        ClickMode::Replace
    }
}

/// Applies a click on `index` to the selection and reports the mode used.
///
/// `index` is expected to come from a hit test against `board`. Rectangle
/// selection on a board with a ragged final row can still produce indices at
/// or past `board.len()`; growth never restores squareness, and this keeps
/// the original row/column interpretation rather than clamping.
pub fn apply_click(
    board: &Board,
    selection: &mut Selection,
    index: usize,
    modifiers: ClickModifiers,
) -> ClickMode {
    let mode = click_mode(modifiers, selection.anchor());
    match (mode, selection.anchor()) {
        (ClickMode::Rectangle, Some(anchor)) => {
            let a = board.position_of(anchor);
            let b = board.position_of(index);
            let (min_row, max_row) = (a.row.min(b.row), a.row.max(b.row));
            let (min_col, max_col) = (a.col.min(b.col), a.col.max(b.col));
            let side = board.side().max(1);
            selection.replace(
                (min_row..=max_row)
                    .flat_map(|row| (min_col..=max_col).map(move |col| row * side + col)),
            );
        }
        (ClickMode::Range, Some(anchor)) => {
            selection.replace(anchor.min(index)..=anchor.max(index));
        }
        (ClickMode::Toggle, _) => selection.toggle(index),
        (ClickMode::Replace, _) => selection.select_only(index),
        // click_mode only yields Rectangle/Range when an anchor exists.
        (ClickMode::Rectangle | ClickMode::Range, None) => unreachable!(),
    }
    mode
}

/// Error for the board-growth entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrowError {
    /// The submitted count was not a positive base-10 integer.
    InvalidCount { input: String },
}

impl fmt::Display for GrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCount { input } => {
                write!(f, "not a positive number of squares: '{input}'")
            }
        }
    }
}

impl std::error::Error for GrowError {}

/// Parses a user-supplied growth count.
///
/// Leading/trailing ASCII whitespace is tolerated; anything that does not
/// parse in full as a positive base-10 integer is rejected.
pub fn parse_grow_count(input: &str) -> Result<usize, GrowError> {
    let invalid = || GrowError::InvalidCount { input: input.to_owned() };
    let count: i64 = input.trim().parse().map_err(|_| invalid())?;
    if count <= 0 {
        return Err(invalid());
    }
    Ok(count as usize)
}

/// Parses `input` and appends that many cells to the board.
///
/// On error nothing is mutated. The selection and anchor are left untouched
/// either way; surviving indices keep referring to their original cells.
pub fn grow(board: &mut Board, input: &str) -> Result<usize, GrowError> {
    let count = parse_grow_count(input)?;
    board.grow(count);
    Ok(count)
}
