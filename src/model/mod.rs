// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Data model: the board, its selection, and click modifier snapshots.

mod board;
mod modifiers;
mod selection;

pub use board::{Board, Cell, CellPos, DEFAULT_BOARD_LEN};
pub use modifiers::ClickModifiers;
pub use selection::Selection;
