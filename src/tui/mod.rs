// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Terminal UI.
//!
//! The login gate and the selectable board (ratatui + crossterm). The event
//! loop owns every mutation; the only other thread is the credential lookup
//! spawned on submit and polled here.

use std::error::Error;
use std::io::{self, Stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton, MouseEvent, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::auth::{AuthError, UserRecord, Verifier};
use crate::model::{Board, Selection};
use crate::ops::{self, GrowError};
use crate::store::{SessionStore, ADMIN_FLAG_KEY, IDENTIFIER_KEY, SESSION_MARKER_KEY};

mod modifiers;
mod theme;

use modifiers::ModifierTracker;
use theme::TuiTheme;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const TOAST_TTL: Duration = Duration::from_secs(4);
const CELL_WIDTH: u16 = 6;
const CELL_HEIGHT: u16 = 3;

/// Runs the TUI until the user quits.
pub fn run(store: SessionStore, verifier: Verifier) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(store, verifier, theme);

    while !app.should_quit {
        app.poll_pending_login();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            let event = event::read()?;
            app.tracker.observe(&event);
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Owns the terminal state for the lifetime of the UI.
///
/// Everything acquired here (raw mode, alternate screen, mouse capture,
/// focus-change reporting, keyboard enhancement) is released in `Drop`;
/// repeated entry cannot leak terminal-global handlers.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keyboard_enhanced: bool,
}

impl TerminalSession {
    fn new() -> Result<Self, io::Error> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;

        let keyboard_enhanced =
            crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                )
            )?;
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal, keyboard_enhanced })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> Result<(), io::Error> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ =
            execute!(io::stdout(), DisableFocusChange, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoginField {
    #[default]
    Email,
    Secret,
    Admin,
}

#[derive(Debug, Default)]
struct LoginForm {
    email: String,
    secret: String,
    admin: bool,
    focus: LoginField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HomeFocus {
    #[default]
    Board,
    GrowEntry,
}

struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    store: SessionStore,
    verifier: Verifier,
    theme: TuiTheme,
    view: View,
    login: LoginForm,
    pending_login: Option<mpsc::Receiver<Result<UserRecord, AuthError>>>,
    board: Board,
    selection: Selection,
    grow_entry: String,
    home_focus: HomeFocus,
    board_area: Rect,
    tracker: ModifierTracker,
    toast: Option<Toast>,
    alert: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(store: SessionStore, verifier: Verifier, theme: TuiTheme) -> Self {
        let view = if store.has_session_marker() { View::Home } else { View::Login };
        Self {
            store,
            verifier,
            theme,
            view,
            login: LoginForm::default(),
            pending_login: None,
            board: Board::default(),
            selection: Selection::new(),
            grow_entry: String::new(),
            home_focus: HomeFocus::default(),
            board_area: Rect::default(),
            tracker: ModifierTracker::default(),
            toast: None,
            alert: None,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Modal alert: nothing else happens until it is dismissed.
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        match self.view {
            View::Login => self.handle_login_key(key),
            View::Home => self.handle_home_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.login.focus = next_login_field(self.login.focus),
            KeyCode::BackTab => self.login.focus = prev_login_field(self.login.focus),
            KeyCode::Enter => self.submit_login(),
            // Cancelling drops the receiver; a late completion goes nowhere.
            KeyCode::Esc => self.pending_login = None,
            KeyCode::Backspace => match self.login.focus {
                LoginField::Email => {
                    self.login.email.pop();
                }
                LoginField::Secret => {
                    self.login.secret.pop();
                }
                LoginField::Admin => {}
            },
            KeyCode::Char(' ') if self.login.focus == LoginField::Admin => {
                self.login.admin = !self.login.admin;
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.login.focus {
                    LoginField::Email => self.login.email.push(ch),
                    LoginField::Secret => self.login.secret.push(ch),
                    LoginField::Admin => {}
                }
            }
            _ => {}
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match self.home_focus {
            HomeFocus::GrowEntry => match key.code {
                KeyCode::Enter => self.submit_grow(),
                KeyCode::Esc | KeyCode::Tab => self.home_focus = HomeFocus::Board,
                KeyCode::Backspace => {
                    self.grow_entry.pop();
                }
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.grow_entry.push(ch);
                }
                _ => {}
            },
            HomeFocus::Board => match key.code {
                KeyCode::Tab => self.home_focus = HomeFocus::GrowEntry,
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('l') => self.logout(),
                _ => {}
            },
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.alert.is_some() || self.view != View::Home {
            return;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(index) = self.cell_at(mouse.column, mouse.row) else {
            return;
        };
        let modifiers = self.tracker.click_modifiers(mouse.modifiers);
        ops::apply_click(&self.board, &mut self.selection, index, modifiers);
    }

    /// Maps terminal coordinates onto a cell index, if they land on one.
    ///
    /// Uses the area the board was last drawn into, so clicks before the
    /// first draw (zero-sized area) fall through.
    fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.board_area;
        if column < area.x
            || row < area.y
            || column >= area.x.saturating_add(area.width)
            || row >= area.y.saturating_add(area.height)
        {
            return None;
        }
        let col = usize::from((column - area.x) / CELL_WIDTH);
        let row_idx = usize::from((row - area.y) / CELL_HEIGHT);
        let side = self.board.side();
        if side == 0 || col >= side {
            return None;
        }
        let index = row_idx * side + col;
        (index < self.board.len()).then_some(index)
    }

    fn submit_login(&mut self) {
        if self.pending_login.is_some() {
            return;
        }
        let email = self.login.email.trim().to_owned();
        let secret = self.login.secret.clone();
        let verifier = self.verifier.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may be gone by the time this finishes; a failed
            // send is the cancelled-login path.
            let _ = tx.send(verifier.verify(&email, &secret));
        });
        self.pending_login = Some(rx);
    }

    fn poll_pending_login(&mut self) {
        let Some(rx) = &self.pending_login else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.pending_login = None;
                self.complete_login(outcome);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.pending_login = None;
                self.complete_login(Err(AuthError::Request(
                    "verification thread exited".to_owned(),
                )));
            }
        }
    }

    fn complete_login(&mut self, outcome: Result<UserRecord, AuthError>) {
        match outcome {
            Ok(record) => {
                let email = self.login.email.trim().to_owned();
                let admin = if self.login.admin { "true" } else { "false" };
                let written = [
                    self.store.set(SESSION_MARKER_KEY, email.as_str()),
                    self.store.set(IDENTIFIER_KEY, email.as_str()),
                    self.store.set(ADMIN_FLAG_KEY, admin),
                ];
                if let Some(err) = written.into_iter().find_map(Result::err) {
                    self.set_toast(err.to_string());
                } else {
                    self.set_toast(format!("Signed in as {}", record.email));
                }
                self.login.secret.clear();
                self.view = View::Home;
            }
            Err(err) => self.set_toast(err.user_message()),
        }
    }

    fn submit_grow(&mut self) {
        match ops::grow(&mut self.board, &self.grow_entry) {
            Ok(added) => {
                self.grow_entry.clear();
                self.set_toast(format!("Added {added} squares"));
            }
            Err(GrowError::InvalidCount { .. }) => {
                self.alert = Some(ops::INVALID_COUNT_MESSAGE.to_owned());
            }
        }
    }

    /// Destroys all session state unconditionally and returns to the gate.
    fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            self.set_toast(err.to_string());
        }
        self.board = Board::default();
        self.selection = Selection::new();
        self.grow_entry.clear();
        self.home_focus = HomeFocus::default();
        self.login = LoginForm::default();
        self.view = View::Login;
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast =
            Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn live_toast_message(&mut self) -> Option<String> {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= Instant::now()) {
            self.toast = None;
        }
        self.toast.as_ref().map(|toast| toast.message.clone())
    }
}

fn next_login_field(field: LoginField) -> LoginField {
    match field {
        LoginField::Email => LoginField::Secret,
        LoginField::Secret => LoginField::Admin,
        LoginField::Admin => LoginField::Email,
    }
}

fn prev_login_field(field: LoginField) -> LoginField {
    match field {
        LoginField::Email => LoginField::Admin,
        LoginField::Secret => LoginField::Email,
        LoginField::Admin => LoginField::Secret,
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Login => draw_login(frame, app, rows[0]),
        View::Home => draw_home(frame, app, rows[0]),
    }
    draw_footer(frame, app, rows[1]);

    if let Some(message) = app.alert.clone() {
        draw_alert(frame, &app.theme, area, &message);
    }
}

fn draw_login(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let card = centered_rect(area, 46, 9);
    let block = Block::default()
        .title(" Sign in ")
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_style(true))
        .style(app.theme.base_style());
    let inner = block.inner(card);
    frame.render_widget(Clear, card);
    frame.render_widget(block, card);

    let masked = "*".repeat(app.login.secret.chars().count());
    let checkbox = if app.login.admin { "[x] administrator" } else { "[ ] administrator" };
    let status = if app.pending_login.is_some() {
        Line::from(Span::styled("Signing in…".to_owned(), app.theme.status_style()))
    } else {
        Line::from("")
    };

    let lines = vec![
        form_line(&app.theme, "email", &app.login.email, app.login.focus == LoginField::Email),
        Line::from(""),
        form_line(&app.theme, "password", &masked, app.login.focus == LoginField::Secret),
        Line::from(""),
        form_line(&app.theme, "admin", checkbox, app.login.focus == LoginField::Admin),
        Line::from(""),
        status,
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn form_line(theme: &TuiTheme, label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let label_style =
        if focused { theme.panel_border_style(true) } else { theme.footer_label_style() };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<10}"), label_style),
        Span::styled(format!("{value}{cursor}"), theme.base_style()),
    ])
}

fn draw_home(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_home_header(frame, app, rows[0]);

    // Hit tests use the same rect the cells are painted into.
    app.board_area = rows[1];
    draw_board(frame, app, rows[1]);
}

fn draw_home_header(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(area);

    let entry_focused = app.home_focus == HomeFocus::GrowEntry;
    let cursor = if entry_focused { "_" } else { "" };
    let entry = Paragraph::new(format!("{}{cursor}", app.grow_entry))
        .style(app.theme.base_style())
        .block(
            Block::default()
                .title(" Add squares ")
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_style(entry_focused)),
        );
    frame.render_widget(entry, columns[0]);

    let identity = app.store.get(IDENTIFIER_KEY).unwrap_or("").to_owned();
    let summary = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} cells", app.board.len()), app.theme.footer_label_style()),
            Span::styled(
                format!("  {} selected", app.selection.len()),
                app.theme.footer_label_style(),
            ),
            Span::styled(format!("   {identity}"), app.theme.status_style()),
        ]),
    ])
    .style(app.theme.base_style());
    frame.render_widget(summary, columns[1]);
}

fn draw_board(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let side = app.board.side();
    if side == 0 {
        return;
    }
    for index in 0..app.board.len() {
        // Raw row-major paint; a ragged tail lands on an extra partial row.
        let col = (index % side) as u32;
        let row = (index / side) as u32;
        let x = u32::from(area.x) + col * u32::from(CELL_WIDTH);
        let y = u32::from(area.y) + row * u32::from(CELL_HEIGHT);
        let fits_x = x + u32::from(CELL_WIDTH) <= u32::from(area.x) + u32::from(area.width);
        let fits_y = y + u32::from(CELL_HEIGHT) <= u32::from(area.y) + u32::from(area.height);
        if !fits_x || !fits_y {
            // Cells that do not fit the viewport are not shown.
            continue;
        }
        let rect = Rect::new(x as u16, y as u16, CELL_WIDTH, CELL_HEIGHT);

        let selected = app.selection.contains(index);
        let anchored = app.selection.anchor() == Some(index);
        let style =
            if selected { app.theme.selection_style() } else { app.theme.base_style() };
        let border_style = if anchored {
            app.theme.anchor_style()
        } else if selected {
            app.theme.selection_style()
        } else {
            app.theme.panel_border_style(false)
        };
        let cell = Block::default().borders(Borders::ALL).border_style(border_style).style(style);
        frame.render_widget(cell, rect);
    }
}

fn draw_footer(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let toast = app.live_toast_message();
    let hints: &[(&str, &str)] = match app.view {
        View::Login => {
            &[("enter", "sign in"), ("tab", "next field"), ("esc", "cancel"), ("ctrl+c", "quit")]
        }
        View::Home => {
            &[("click", "select"), ("tab", "add squares"), ("l", "logout"), ("q", "quit")]
        }
    };
    let line = footer_line(&app.theme, hints, toast);
    frame.render_widget(Paragraph::new(line).style(app.theme.base_style()), area);
}

fn footer_line(theme: &TuiTheme, hints: &[(&str, &str)], toast: Option<String>) -> Line<'static> {
    let mut spans = Vec::new();
    spans.push(Span::styled(" ".to_owned(), theme.base_style()));
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ".to_owned(), theme.base_style()));
        }
        spans.push(Span::styled((*key).to_owned(), theme.footer_key_style()));
        spans.push(Span::styled(format!(" {label}"), theme.footer_label_style()));
    }
    if let Some(message) = toast {
        spans.push(Span::styled("  │ ".to_owned(), theme.footer_label_style()));
        spans.push(Span::styled(message, theme.status_style()));
    }
    Line::from(spans)
}

fn draw_alert(frame: &mut Frame<'_>, theme: &TuiTheme, area: Rect, message: &str) {
    let popup = centered_rect(area, 44, 5);
    let block = Block::default()
        .title(" Invalid count ")
        .borders(Borders::ALL)
        .border_style(theme.error_style())
        .style(theme.base_style());
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let text = vec![
        Line::from(message.to_owned()),
        Line::from(Span::styled("press enter to dismiss".to_owned(), theme.footer_label_style())),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests;
