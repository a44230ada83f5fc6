// ui rendering

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::core::Relevance;
use crate::tui::app::{App, LogLevel, Mode, Panel, Popup};
use crate::tui::theme::ThemeKind;

const LOGO: &[&str] = &["  .-.  bluum", " (   ) daily", "  `-'  reflection"];

pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;

    // clear with bg color
    frame.render_widget(Clear, frame.area());
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    // header + content + footer
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, main[0]);
    render_content(frame, app, main[1]);
    render_footer(frame, app, main[2]);

    match app.popup {
        Popup::Themes => render_theme_popup(frame, app),
        Popup::Moods => render_mood_popup(frame, app),
        Popup::None => {}
    }
}

fn border_for(app: &App, panel: Panel) -> ratatui::style::Style {
    if app.panel == panel {
        app.theme.accent()
    } else {
        app.theme.border()
    }
}

fn render_header(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.base());
    frame.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)])
        .margin(1)
        .split(area);

    let logo: Vec<Line> = LOGO
        .iter()
        .map(|&line| Line::styled(line, theme.accent()))
        .collect();
    frame.render_widget(Paragraph::new(logo).style(theme.base()), inner[0]);

    let latency = app
        .latency_ms
        .map(|ms| format!("{ms}ms"))
        .unwrap_or_else(|| "-".to_string());

    let classifier = if app.agent_info.remote_classifier {
        app.agent_info.model.as_str()
    } else {
        "local heuristics"
    };

    let mode_str = match app.mode {
        Mode::Normal => "normal",
        Mode::Insert => "insert",
    };

    let info = vec![
        Line::from(vec![
            Span::styled("| Mood: ", theme.muted()),
            Span::styled(&app.mood, theme.accent()),
            Span::styled("  | Turns: ", theme.muted()),
            Span::styled(app.turns.len().to_string(), theme.base()),
        ]),
        Line::from(vec![
            Span::styled("| Classifier: ", theme.muted()),
            Span::styled(classifier, theme.base()),
            Span::styled(" | ", theme.muted()),
            Span::styled(latency, theme.accent()),
        ]),
        Line::from(vec![
            Span::styled("| Mode: ", theme.muted()),
            Span::styled(mode_str, theme.accent()),
        ]),
    ];
    frame.render_widget(Paragraph::new(info).style(theme.base()), inner[1]);
}

fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(cols[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(cols[1]);

    render_entry(frame, app, left[0]);
    render_response(frame, app, left[1]);
    render_conversation(frame, app, right[0]);
    render_logs(frame, app, right[1]);
}

fn render_footer(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let parts = vec![
        Span::styled(" Enter ", theme.base().bg(theme.accent).fg(theme.bg)),
        Span::styled(" Submit ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("Esc ", theme.accent()),
        Span::styled("Normal ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("m ", theme.accent()),
        Span::styled("Mood ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("r ", theme.accent()),
        Span::styled("Start over ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("Tab ", theme.accent()),
        Span::styled("Panels ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("t ", theme.accent()),
        Span::styled("Theme ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("q ", theme.accent()),
        Span::styled("Quit ", theme.muted()),
    ];

    let paragraph = Paragraph::new(Line::from(parts))
        .style(theme.base())
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_entry(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(Span::styled(" Your reflection ", theme.title()))
        .borders(Borders::ALL)
        .border_style(border_for(app, Panel::Entry))
        .style(theme.base());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("prompt: ", theme.muted()),
            Span::styled(app.prompt.clone(), theme.accent()),
        ]),
        Line::from(""),
    ];
    // prompt line + blank
    let header_rows = 2u16;

    if app.loading {
        lines.push(Line::styled("thinking...", theme.muted()));
    } else if app.entry.is_empty() && app.mode != Mode::Insert {
        lines.push(Line::styled("press 'i' to write...", theme.muted()));
    } else {
        lines.extend(
            app.entry
                .split('\n')
                .map(|l| Line::styled(l.to_string(), theme.base())),
        );
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);

    // real terminal cursor in insert mode
    if app.mode == Mode::Insert && app.panel == Panel::Entry && !app.loading {
        let inner = area.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });

        let (line, col) = app
            .entry
            .chars()
            .take(app.entry_cursor)
            .fold((0u16, 0u16), |(line, col), ch| {
                if ch == '\n' { (line + 1, 0) } else { (line, col + 1) }
            });

        let x = inner.x + col;
        let y = inner.y + header_rows + line;
        if x < inner.right() && y < inner.bottom() {
            frame.set_cursor_position((x, y));
        }
    }
}

fn render_response(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(Span::styled(" Bluum says ", theme.title()))
        .borders(Borders::ALL)
        .border_style(border_for(app, Panel::Response))
        .style(theme.base());

    let lines: Vec<Line> = match &app.outcome {
        None => vec![Line::styled(
            "submit an entry to get a response",
            theme.muted(),
        )],
        Some(outcome) => {
            let category = outcome.category();
            let mut header = vec![
                Span::styled("category: ", theme.muted()),
                Span::styled(category.as_str(), theme.category(category)),
            ];
            if let Some(relevance) = outcome.relevance() {
                let (label, style) = match relevance {
                    Relevance::Relevant => ("on topic", theme.success()),
                    Relevance::NotRelevant => ("off topic", theme.warning()),
                };
                header.push(Span::styled("  | ", theme.muted()));
                header.push(Span::styled(label, style));
            }

            let mut lines = vec![Line::from(header), Line::from("")];
            lines.extend(
                outcome
                    .result
                    .response_text
                    .lines()
                    .map(|l| Line::styled(l.to_string(), theme.category(category))),
            );
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((app.response_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_conversation(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(Span::styled(" Conversation ", theme.title()))
        .borders(Borders::ALL)
        .border_style(border_for(app, Panel::Conversation))
        .style(theme.base());

    let lines: Vec<Line> = if app.turns.is_empty() {
        vec![Line::styled("nothing yet", theme.muted())]
    } else {
        app.turns
            .iter()
            .flat_map(|turn| {
                [
                    Line::from(vec![
                        Span::styled("> ", theme.accent()),
                        Span::styled(turn.prompt.clone(), theme.muted()),
                    ]),
                    Line::styled(turn.entry.clone(), theme.base()),
                    Line::from(""),
                ]
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((app.conversation_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_logs(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(Span::styled(" Logs ", theme.title()))
        .borders(Borders::ALL)
        .border_style(border_for(app, Panel::Logs))
        .style(theme.base());

    let lines: Vec<Line> = app
        .logs
        .iter()
        .map(|entry| {
            let (prefix, style) = match entry.level {
                LogLevel::Ok => ("[OK]", theme.success()),
                LogLevel::Info => ("[--]", theme.muted()),
                LogLevel::Warn => ("[!!]", theme.warning()),
                LogLevel::Error => ("[ERR]", theme.error()),
            };
            Line::from(vec![
                Span::styled(format!("{prefix} "), style),
                Span::styled(&entry.message, theme.base()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .scroll((app.log_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_list_popup(
    frame: &mut Frame,
    app: &App,
    title: &str,
    items: &[&str],
    selected: usize,
) {
    let theme = &app.theme;
    let area = centered_rect(40, 60, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(format!(" {title} "), theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .style(theme.base());

    let mut lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(i, &name)| {
            if i == selected {
                Line::from(vec![
                    Span::styled(" > ", theme.accent()),
                    Span::styled(name.to_string(), theme.selected().fg(theme.accent)),
                ])
            } else {
                Line::styled(format!("   {name}"), theme.base())
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" j/k ", theme.accent()),
        Span::styled("navigate  ", theme.muted()),
        Span::styled("enter ", theme.accent()),
        Span::styled("select  ", theme.muted()),
        Span::styled("esc ", theme.accent()),
        Span::styled("close", theme.muted()),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block).style(theme.base()), area);
}

fn render_theme_popup(frame: &mut Frame, app: &mut App) {
    let names: Vec<&str> = ThemeKind::ALL.iter().map(|k| k.name()).collect();
    render_list_popup(frame, app, "select theme", &names, app.theme_scroll);
}

fn render_mood_popup(frame: &mut Frame, app: &mut App) {
    let names: Vec<&str> = app.moods.iter().map(String::as_str).collect();
    render_list_popup(frame, app, "how are you feeling today?", &names, app.mood_scroll);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
