// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

/// Modifier-key state sampled at the moment of a click.
///
/// Click handling takes one of these explicitly instead of reading shared
/// mutable flags; the TUI's tracker produces the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ClickModifiers {
    pub const NONE: Self = Self { ctrl: false, shift: false, alt: false };
    pub const CTRL: Self = Self { ctrl: true, shift: false, alt: false };
    pub const SHIFT: Self = Self { ctrl: false, shift: true, alt: false };
    pub const ALT: Self = Self { ctrl: false, shift: false, alt: true };

    /// Boolean union, used to merge tracked key state with the modifier bits
    /// a terminal reports on the mouse event itself.
    pub fn union(self, other: Self) -> Self {
        Self {
            ctrl: self.ctrl || other.ctrl,
            shift: self.shift || other.shift,
            alt: self.alt || other.alt,
        }
    }
}
