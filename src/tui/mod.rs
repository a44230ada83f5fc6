// terminal ui

mod app;
mod event;
mod theme;
mod ui;

pub use app::App;

use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use std::time::Duration;
use tracing::info;

use crate::{Config, Error, Journal};
use app::{AgentInfo, LogLevel, Mode};
use event::{Action, handle_event, poll_event};

pub async fn run(config: &Config) -> Result<(), Error> {
    // build everything before touching the terminal so errors print normally
    let journal = config.build_journal().await?;
    let agent_info = AgentInfo {
        model: config.model.clone(),
        remote_classifier: !config.heuristic_only
            && config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()),
    };

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &journal, agent_info).await;

    // restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    journal: &Journal,
    agent_info: AgentInfo,
) -> Result<(), Error> {
    let prompts = journal.prompts();
    let mut session = journal
        .start(None)
        .ok_or_else(|| Error::Prompts("no default mood".to_string()))?;

    let moods = prompts.moods().map(str::to_string).collect();
    let mut app = App::new(
        moods,
        session.mood.clone(),
        session.current_prompt(prompts),
        agent_info,
    );

    let mut last_mode = None;

    loop {
        if last_mode != Some(app.mode) {
            let cursor_style = match app.mode {
                Mode::Insert => SetCursorStyle::BlinkingBar,
                Mode::Normal => SetCursorStyle::BlinkingBlock,
            };
            execute!(terminal.backend_mut(), cursor_style).ok();
            last_mode = Some(app.mode);
        }

        terminal.draw(|frame| ui::render(frame, &mut app))?;

        let Some(event) = poll_event(Duration::from_millis(100))? else {
            continue;
        };

        match handle_event(&mut app, event) {
            Action::Quit => break,
            Action::Submit(entry) => {
                // render loading state
                terminal.draw(|frame| ui::render(frame, &mut app))?;

                let outcome = journal.submit(&mut session, &entry).await;
                let next_prompt = session.current_prompt(prompts);
                app.set_outcome(outcome, session.turns(), next_prompt);
            }
            Action::ChangeMood(mood) => match journal.start(Some(&mood)) {
                Some(new_session) => {
                    info!(mood = %new_session.mood, "mood changed");
                    session = new_session;
                    app.reset(session.mood.clone(), session.current_prompt(prompts));
                }
                None => app.log(LogLevel::Error, format!("unknown mood: {mood}")),
            },
            Action::StartOver => {
                if let Some(new_session) = journal.start(Some(&session.mood)) {
                    session = new_session;
                    app.reset(session.mood.clone(), session.current_prompt(prompts));
                }
            }
            Action::None => {}
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_errors_are_io_errors() {
        fn no_terminal() -> Result<(), Error> {
            Err(io::Error::other("not a tty"))?;
            Ok(())
        }
        assert!(matches!(no_terminal(), Err(Error::Io(_))));
    }
}
