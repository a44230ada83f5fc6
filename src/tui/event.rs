// key handling - turns key presses into app edits and journal actions

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::tui::app::{App, Mode, Popup};

/// What the main loop has to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit(String),
    ChangeMood(String),
    StartOver,
}

pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    event::read().map(Some)
}

pub fn handle_event(app: &mut App, event: Event) -> Action {
    let Event::Key(key) = event else {
        return Action::None;
    };
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // ctrl+c quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match (app.popup, app.mode) {
        (Popup::Themes, _) => themes_key(app, key.code),
        (Popup::Moods, _) => moods_key(app, key.code),
        (Popup::None, Mode::Normal) => normal_key(app, key.code),
        (Popup::None, Mode::Insert) => insert_key(app, key),
    }
}

fn submit(app: &mut App) -> Action {
    app.submit().map_or(Action::None, Action::Submit)
}

fn themes_key(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.theme_scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.theme_scroll_down(),
        KeyCode::Enter => app.select_theme(),
        KeyCode::Esc | KeyCode::Char('q') => app.close_popup(),
        _ => {}
    }
    Action::None
}

fn moods_key(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Enter => return app.select_mood().map_or(Action::None, Action::ChangeMood),
        KeyCode::Up | KeyCode::Char('k') => app.mood_scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.mood_scroll_down(),
        KeyCode::Esc | KeyCode::Char('q') => app.close_popup(),
        _ => {}
    }
    Action::None
}

fn normal_key(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('r') => return Action::StartOver,
        KeyCode::Enter => return submit(app),
        KeyCode::Char('i') => app.enter_insert(),
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.move_cursor_end();
            app.enter_insert();
        }
        KeyCode::Char('m') => app.open_mood_popup(),
        KeyCode::Char('t') => app.open_theme_popup(),
        KeyCode::Tab => app.cycle_panel(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        _ => {}
    }
    Action::None
}

fn insert_key(app: &mut App, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        // shift/ctrl+enter and ctrl+j break the line instead of submitting
        KeyCode::Enter if ctrl || shift => app.insert_newline(),
        KeyCode::Char('j') if ctrl => app.insert_newline(),
        KeyCode::Char('a') if ctrl => app.move_cursor_start(),
        KeyCode::Char('e') if ctrl => app.move_cursor_end(),
        KeyCode::Char('u') if ctrl => app.clear_entry(),
        _ if ctrl => {}

        KeyCode::Enter => return submit(app),
        KeyCode::Esc => app.exit_insert(),
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_start(),
        KeyCode::End => app.move_cursor_end(),
        _ => {}
    }
    Action::None
}
