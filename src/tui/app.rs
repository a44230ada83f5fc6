// app state for the tui

use crate::core::{Category, Outcome, Turn};
use crate::tui::theme::{Theme, ThemeKind, detect_theme};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Entry,
    Response,
    Conversation,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Themes,
    Moods,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AgentInfo {
    pub model: String,
    pub remote_classifier: bool,
}

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub panel: Panel,
    pub popup: Popup,
    pub theme_kind: ThemeKind,
    pub theme: Theme,
    pub agent_info: AgentInfo,

    // moods in file order, and the selected one
    pub moods: Vec<String>,
    pub mood: String,
    pub mood_scroll: usize,

    // what the user is answering
    pub prompt: String,

    // entry editor (cursor counts chars, not bytes)
    pub entry: String,
    pub entry_cursor: usize,

    // last result
    pub outcome: Option<Outcome>,
    pub latency_ms: Option<u64>,

    // mirror of the session's turns
    pub turns: Vec<Turn>,

    pub logs: Vec<LogEntry>,

    pub loading: bool,
    pub submit_start: Option<Instant>,

    // scroll
    pub response_scroll: usize,
    pub conversation_scroll: usize,
    pub log_scroll: usize,
    pub theme_scroll: usize,
}

impl App {
    pub fn new(moods: Vec<String>, mood: String, prompt: String, agent_info: AgentInfo) -> Self {
        let theme_kind = detect_theme();
        let mood_scroll = moods.iter().position(|m| *m == mood).unwrap_or(0);

        let mut app = Self {
            running: true,
            mode: Mode::Insert,
            panel: Panel::Entry,
            popup: Popup::None,
            theme_kind,
            theme: Theme::from_kind(theme_kind),
            agent_info,
            moods,
            mood,
            mood_scroll,
            prompt,
            entry: String::new(),
            entry_cursor: 0,
            outcome: None,
            latency_ms: None,
            turns: Vec::new(),
            logs: Vec::new(),
            loading: false,
            submit_start: None,
            response_scroll: 0,
            conversation_scroll: 0,
            log_scroll: 0,
            theme_scroll: theme_kind.index(),
        };

        app.log(LogLevel::Ok, format!("mood: {}", app.mood));
        if app.agent_info.remote_classifier {
            app.log(
                LogLevel::Info,
                format!("classifying with {}", app.agent_info.model),
            );
        } else {
            app.log(LogLevel::Warn, "no model, using local heuristics".to_string());
        }

        app
    }

    pub fn log(&mut self, level: LogLevel, message: String) {
        self.logs.push(LogEntry { level, message });
        // auto-scroll to bottom
        if self.logs.len() > 1 {
            self.log_scroll = self.logs.len().saturating_sub(10);
        }
    }

    // themes
    pub fn set_theme(&mut self, kind: ThemeKind) {
        self.theme_kind = kind;
        self.theme = Theme::from_kind(kind);
        self.theme_scroll = kind.index();
    }

    pub fn open_theme_popup(&mut self) {
        self.popup = Popup::Themes;
        self.theme_scroll = self.theme_kind.index();
    }

    pub fn theme_scroll_up(&mut self) {
        if self.theme_scroll > 0 {
            self.theme_scroll -= 1;
            self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        }
    }

    pub fn theme_scroll_down(&mut self) {
        if self.theme_scroll < ThemeKind::ALL.len() - 1 {
            self.theme_scroll += 1;
            self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        }
    }

    pub fn select_theme(&mut self) {
        self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        self.close_popup();
    }

    // moods
    pub fn open_mood_popup(&mut self) {
        self.popup = Popup::Moods;
        self.mood_scroll = self.moods.iter().position(|m| *m == self.mood).unwrap_or(0);
    }

    pub fn mood_scroll_up(&mut self) {
        self.mood_scroll = self.mood_scroll.saturating_sub(1);
    }

    pub fn mood_scroll_down(&mut self) {
        if self.mood_scroll + 1 < self.moods.len() {
            self.mood_scroll += 1;
        }
    }

    // the highlighted mood, popup closed
    pub fn select_mood(&mut self) -> Option<String> {
        self.close_popup();
        self.moods.get(self.mood_scroll).cloned()
    }

    pub fn close_popup(&mut self) {
        self.popup = Popup::None;
    }

    /// Fresh conversation, after a mood change or "start over".
    pub fn reset(&mut self, mood: String, prompt: String) {
        self.log(LogLevel::Info, format!("new session ({mood})"));
        self.mood = mood;
        self.prompt = prompt;
        self.outcome = None;
        self.latency_ms = None;
        self.turns.clear();
        self.clear_entry();
        self.response_scroll = 0;
        self.conversation_scroll = 0;
        self.mode = Mode::Insert;
        self.panel = Panel::Entry;
    }

    pub fn cycle_panel(&mut self) {
        self.panel = match self.panel {
            Panel::Entry => Panel::Response,
            Panel::Response => Panel::Conversation,
            Panel::Conversation => Panel::Logs,
            Panel::Logs => Panel::Entry,
        };
    }

    pub fn enter_insert(&mut self) {
        self.mode = Mode::Insert;
        self.panel = Panel::Entry;
    }

    pub fn exit_insert(&mut self) {
        self.mode = Mode::Normal;
    }

    // entry editing
    fn byte_index(&self, char_index: usize) -> usize {
        self.entry
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.entry.len())
    }

    fn entry_len(&self) -> usize {
        self.entry.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.entry_cursor);
        self.entry.insert(at, c);
        self.entry_cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_char(&mut self) {
        if self.entry_cursor > 0 {
            self.entry_cursor -= 1;
            let at = self.byte_index(self.entry_cursor);
            self.entry.remove(at);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.entry_cursor < self.entry_len() {
            let at = self.byte_index(self.entry_cursor);
            self.entry.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.entry_cursor = self.entry_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.entry_cursor < self.entry_len() {
            self.entry_cursor += 1;
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.entry_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.entry_cursor = self.entry_len();
    }

    pub fn clear_entry(&mut self) {
        self.entry.clear();
        self.entry_cursor = 0;
    }

    /// Take the entry for submission. Blank entries go through too: they classify as quiet.
    pub fn submit(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }
        let entry = std::mem::take(&mut self.entry);
        self.entry_cursor = 0;
        self.submit_start = Some(Instant::now());
        self.loading = true;
        Some(entry)
    }

    pub fn set_outcome(&mut self, outcome: Outcome, turns: &[Turn], next_prompt: String) {
        if let Some(start) = self.submit_start.take() {
            self.latency_ms = Some(start.elapsed().as_millis() as u64);
        }

        let level = match outcome.category() {
            Category::Safety => LogLevel::Error,
            Category::Instruction | Category::Unclear => LogLevel::Warn,
            Category::Quiet | Category::Positive => LogLevel::Ok,
        };
        self.log(level, format!("entry classified: {}", outcome.category()));

        self.outcome = Some(outcome);
        self.turns = turns.to_vec();
        self.prompt = next_prompt;
        self.loading = false;
        self.response_scroll = 0;
        self.conversation_scroll = self.turns.len().saturating_sub(3) * 3;
    }

    pub fn scroll_up(&mut self) {
        match self.panel {
            Panel::Response => self.response_scroll = self.response_scroll.saturating_sub(1),
            Panel::Conversation => {
                self.conversation_scroll = self.conversation_scroll.saturating_sub(1)
            }
            Panel::Logs => self.log_scroll = self.log_scroll.saturating_sub(1),
            Panel::Entry => {}
        }
    }

    pub fn scroll_down(&mut self) {
        match self.panel {
            Panel::Response => self.response_scroll += 1,
            Panel::Conversation => self.conversation_scroll += 1,
            Panel::Logs => self.log_scroll += 1,
            Panel::Entry => {}
        }
    }
}
