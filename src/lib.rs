// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Tessera — a login-gated terminal board of selectable squares.
//!
//! The binary runs a ratatui TUI: a login view backed by a remote credential
//! lookup, and a home view with a growable board of cells supporting
//! modifier-click multi-select (plain, ctrl, shift and alt clicks).

pub mod auth;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;
