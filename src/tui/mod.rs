use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{prelude::*, widgets::*};
use std::io::stdout;
use std::time::Duration;

use crate::proxy::PackageRemoveProxy;
use crate::spoke::SpokeModel;

pub const TITLE: &str = "Packages to remove";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Stay,
    Leave,
}

#[derive(Debug, Default)]
struct SpokeScreen {
    model: SpokeModel,
    cursor: usize,
}

impl SpokeScreen {
    fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor < self.model.len().saturating_sub(1) {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.model.len().saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                self.model.toggle(self.cursor);
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => return Action::Leave,
            _ => {}
        }
        Action::Stay
    }
}

/// Run the full-screen spoke. The selection is applied when the user leaves.
pub fn run(proxy: &mut dyn PackageRemoveProxy) -> Result<Vec<String>> {
    let mut screen = SpokeScreen::default();
    screen
        .model
        .initialize(proxy)
        .context("Failed to fetch package candidates")?;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut screen);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result?;

    screen
        .model
        .apply(proxy)
        .context("Failed to store the package selection")?;
    Ok(screen.model.checked())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, screen: &mut SpokeScreen) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, screen))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if screen.handle_key(key.code) == Action::Leave {
                return Ok(());
            }
        }
    }
}

fn render(f: &mut Frame, screen: &SpokeScreen) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(TITLE).style(Style::default().add_modifier(Modifier::BOLD)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    render_packages(f, chunks[1], screen);

    let status_style = if screen.model.checked_count() == 0 {
        Style::default()
    } else {
        Style::default().fg(Color::Green)
    };
    let status = Paragraph::new(Line::from(screen.model.status()).style(status_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);

    let footer = Paragraph::new("[↑/↓] Move  [Space] Toggle  [Enter] Done")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[3]);
}

fn render_packages(f: &mut Frame, area: Rect, screen: &SpokeScreen) {
    if screen.model.is_empty() {
        let empty = Paragraph::new("No removable packages are offered.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = screen
        .model
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mark = if row.checked { "[x]" } else { "[ ]" };
            let style = if i == screen.cursor {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {} {}", mark, row.name)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Select packages to remove "),
    );

    let mut state = ListState::default().with_selected(Some(screen.cursor));
    f.render_stateful_widget(list, area, &mut state);
}
