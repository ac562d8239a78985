// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Modifier-key tracking for click handling.
//!
//! Standalone press/release events for ctrl, shift and alt only arrive on
//! terminals speaking the kitty keyboard protocol; everywhere else the bits
//! on the mouse event are the source of truth, so clicks take the union of
//! both. Focus loss resets the tracked state: a release missed while the
//! terminal was unfocused cannot leave a key stuck.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::model::ClickModifiers;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ModifierTracker {
    ctrl: bool,
    shift: bool,
    alt: bool,
}

impl ModifierTracker {
    /// Feeds one terminal event into the tracker.
    pub(crate) fn observe(&mut self, event: &Event) {
        match event {
            Event::Key(key) => {
                let pressed = match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => true,
                    KeyEventKind::Release => false,
                };
                if let KeyCode::Modifier(modifier) = key.code {
                    match modifier {
                        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => {
                            self.ctrl = pressed;
                        }
                        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => {
                            self.shift = pressed;
                        }
                        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => {
                            self.alt = pressed;
                        }
                        _ => {}
                    }
                }
            }
            Event::FocusLost => self.reset(),
            _ => {}
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Snapshot for a click, merged with the bits the mouse event carries.
    pub(crate) fn click_modifiers(&self, event_modifiers: KeyModifiers) -> ClickModifiers {
        let tracked = ClickModifiers { ctrl: self.ctrl, shift: self.shift, alt: self.alt };
        tracked.union(ClickModifiers {
            ctrl: event_modifiers.contains(KeyModifiers::CONTROL),
            shift: event_modifiers.contains(KeyModifiers::SHIFT),
            alt: event_modifiers.contains(KeyModifiers::ALT),
        })
    }
}
