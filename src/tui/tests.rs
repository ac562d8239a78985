// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use rstest::rstest;

use super::theme::TuiTheme;
use super::{App, HomeFocus, View, CELL_HEIGHT, CELL_WIDTH};
use crate::auth::{AuthError, UserRecord, Verifier};
use crate::model::Board;
use crate::store::{SessionStore, ADMIN_FLAG_KEY, IDENTIFIER_KEY, SESSION_MARKER_KEY};

fn app_with_store(store: SessionStore) -> App {
    App::new(store, Verifier::demo(), TuiTheme::default())
}

fn home_app() -> App {
    let mut store = SessionStore::ephemeral();
    store.set(SESSION_MARKER_KEY, "ada@example.com").expect("marker");
    store.set(IDENTIFIER_KEY, "ada@example.com").expect("identifier");
    let mut app = app_with_store(store);
    app.board_area = Rect::new(0, 0, 120, 40);
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn left_click(column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
    MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, modifiers }
}

fn toast_message(app: &App) -> Option<&str> {
    app.toast.as_ref().map(|toast| toast.message.as_str())
}

#[test]
fn startup_gates_on_the_session_marker() {
    assert_eq!(app_with_store(SessionStore::ephemeral()).view, View::Login);

    let mut store = SessionStore::ephemeral();
    store.set(SESSION_MARKER_KEY, "ada@example.com").expect("marker");
    assert_eq!(app_with_store(store).view, View::Home);
}

#[test]
fn an_empty_marker_value_does_not_open_the_gate() {
    let mut store = SessionStore::ephemeral();
    store.set(SESSION_MARKER_KEY, "").expect("marker");

    assert_eq!(app_with_store(store).view, View::Login);
}

#[test]
fn successful_login_stores_the_session_and_navigates_home() {
    let mut app = app_with_store(SessionStore::ephemeral());
    app.login.email = "ada@example.com".to_owned();
    app.login.secret = "mosaic".to_owned();
    app.login.admin = true;

    app.complete_login(Ok(UserRecord { email: "ada@example.com".to_owned(), admin: false }));

    assert_eq!(app.view, View::Home);
    assert_eq!(app.store.get(SESSION_MARKER_KEY), Some("ada@example.com"));
    assert_eq!(app.store.get(IDENTIFIER_KEY), Some("ada@example.com"));
    assert_eq!(app.store.get(ADMIN_FLAG_KEY), Some("true"));
    assert!(app.login.secret.is_empty());
}

#[test]
fn rejected_credentials_keep_the_login_view_and_store_nothing() {
    let mut app = app_with_store(SessionStore::ephemeral());
    app.login.email = "ada@example.com".to_owned();

    app.complete_login(Err(AuthError::InvalidCredentials));

    assert_eq!(app.view, View::Login);
    assert_eq!(app.store.get(SESSION_MARKER_KEY), None);
    assert_eq!(toast_message(&app), Some("Invalid credentials"));
}

#[test]
fn a_failed_request_surfaces_the_generic_message() {
    let mut app = app_with_store(SessionStore::ephemeral());

    app.complete_login(Err(AuthError::Request("connection refused".to_owned())));

    assert_eq!(app.view, View::Login);
    assert_eq!(toast_message(&app), Some("Something went wrong"));
}

#[test]
fn logout_clears_foreign_keys_and_returns_to_the_gate() {
    let mut store = SessionStore::ephemeral();
    store.set(SESSION_MARKER_KEY, "ada@example.com").expect("marker");
    store.set("someone-elses-key", "value").expect("foreign");
    let mut app = app_with_store(store);
    app.board.grow(5);

    app.logout();

    assert_eq!(app.view, View::Login);
    assert!(app.store.is_empty());
    assert_eq!(app.board.len(), Board::default().len());
    assert!(app.selection.is_empty());
}

#[test]
fn grow_entry_applies_on_enter() {
    let mut app = home_app();

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.home_focus, HomeFocus::GrowEntry);
    app.handle_key(key(KeyCode::Char('5')));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.board.len(), 41);
    assert!(app.grow_entry.is_empty());
}

#[rstest]
#[case("abc")]
#[case("0")]
#[case("-3")]
fn invalid_grow_input_raises_a_blocking_alert(#[case] input: &str) {
    let mut app = home_app();
    app.grow_entry = input.to_owned();

    app.submit_grow();

    assert!(app.alert.is_some());
    assert_eq!(app.board.len(), 36);
}

#[test]
fn the_alert_blocks_input_until_dismissed() {
    let mut app = home_app();
    app.alert = Some("Please enter a valid positive integer".to_owned());

    app.handle_key(key(KeyCode::Char('q')));
    assert!(!app.should_quit);
    app.handle_mouse(left_click(1, 4, KeyModifiers::NONE));
    assert!(app.selection.is_empty());

    app.handle_key(key(KeyCode::Enter));
    assert!(app.alert.is_none());
}

#[test]
fn left_click_selects_the_hit_cell() {
    let mut app = home_app();

    app.handle_mouse(left_click(CELL_WIDTH * 2 + 1, CELL_HEIGHT + 1, KeyModifiers::NONE));

    // Column 2, row 1 on a 6-wide board.
    assert_eq!(app.selection.anchor(), Some(8));
    assert!(app.selection.contains(8));
    assert_eq!(app.selection.len(), 1);
}

#[test]
fn shift_click_extends_from_the_anchor_via_event_modifiers() {
    let mut app = home_app();

    app.handle_mouse(left_click(CELL_WIDTH * 2, 0, KeyModifiers::NONE));
    app.handle_mouse(left_click(CELL_WIDTH * 2, CELL_HEIGHT, KeyModifiers::SHIFT));

    let selected: Vec<usize> = app.selection.selected().iter().copied().collect();
    assert_eq!(selected, (2..=8).collect::<Vec<_>>());
}

#[test]
fn clicks_before_the_first_draw_are_ignored() {
    let mut app = home_app();
    app.board_area = Rect::default();

    app.handle_mouse(left_click(3, 3, KeyModifiers::NONE));

    assert!(app.selection.is_empty());
}

#[test]
fn non_left_button_events_are_ignored() {
    let mut app = home_app();

    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Right),
        column: 1,
        row: 1,
        modifiers: KeyModifiers::NONE,
    });

    assert!(app.selection.is_empty());
}

#[rstest]
#[case(2, 1, Some(0))]
#[case(2 + CELL_WIDTH - 1, 1 + CELL_HEIGHT - 1, Some(0))]
#[case(2 + CELL_WIDTH, 1, Some(1))]
#[case(2 + CELL_WIDTH * 5, 1 + CELL_HEIGHT * 5, Some(35))]
#[case(2 + CELL_WIDTH * 6, 1, None)]
#[case(0, 0, None)]
fn cell_hit_testing_respects_the_drawn_area(
    #[case] column: u16,
    #[case] row: u16,
    #[case] expected: Option<usize>,
) {
    let mut app = home_app();
    app.board_area = Rect::new(2, 1, 60, 30);

    assert_eq!(app.cell_at(column, row), expected);
}

#[test]
fn the_ragged_tail_is_clickable_but_ends_at_the_last_cell() {
    let mut app = home_app();
    app.board = Board::new(9);
    app.board.grow(2);
    app.board_area = Rect::new(0, 0, 60, 30);

    // Row 3 exists only for columns 0 and 1 on this 11-cell board.
    assert_eq!(app.cell_at(CELL_WIDTH, CELL_HEIGHT * 3), Some(10));
    assert_eq!(app.cell_at(CELL_WIDTH * 2, CELL_HEIGHT * 3), None);
}

#[test]
fn login_form_editing_cycles_fields_and_toggles_the_checkbox() {
    let mut app = app_with_store(SessionStore::ephemeral());

    for ch in "ada".chars() {
        app.handle_key(key(KeyCode::Char(ch)));
    }
    app.handle_key(key(KeyCode::Tab));
    for ch in "pw".chars() {
        app.handle_key(key(KeyCode::Char(ch)));
    }
    app.handle_key(key(KeyCode::Backspace));
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Char(' ')));

    assert_eq!(app.login.email, "ada");
    assert_eq!(app.login.secret, "p");
    assert!(app.login.admin);
}

#[test]
fn escape_cancels_a_pending_login() {
    let mut app = app_with_store(SessionStore::ephemeral());
    let (_tx, rx) = std::sync::mpsc::channel();
    app.pending_login = Some(rx);

    app.handle_key(key(KeyCode::Esc));

    assert!(app.pending_login.is_none());
}

#[test]
fn a_dead_verification_thread_reports_the_generic_failure() {
    let mut app = app_with_store(SessionStore::ephemeral());
    let (tx, rx) = std::sync::mpsc::channel::<Result<UserRecord, AuthError>>();
    app.pending_login = Some(rx);
    drop(tx);

    app.poll_pending_login();

    assert!(app.pending_login.is_none());
    assert_eq!(toast_message(&app), Some("Something went wrong"));
}

#[test]
fn toasts_expire_after_their_ttl() {
    let mut app = home_app();
    app.set_toast("hello");
    assert_eq!(app.live_toast_message().as_deref(), Some("hello"));

    if let Some(toast) = app.toast.as_mut() {
        toast.expires_at = std::time::Instant::now() - std::time::Duration::from_millis(1);
    }

    assert_eq!(app.live_toast_message(), None);
    assert!(app.toast.is_none());
}
