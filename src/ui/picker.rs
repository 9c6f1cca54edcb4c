// ABOUTME: Crossterm event loop and ratatui rendering for the host selection list
// ABOUTME: Maps keystrokes to selector events; drawing never mutates selector state

use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::registry::HostRecord;
use crate::selector::{Selector, SelectorEvent, SelectorState};

const NAME_WIDTH: usize = 30;
const USER_WIDTH: usize = 15;
const PORT_WIDTH: usize = 5;

/// Runs the interactive picker over a non-empty candidate list. Returns
/// the confirmed record, or None when the user quits without choosing.
pub fn pick_host(records: Vec<HostRecord>) -> Result<Option<HostRecord>> {
    let mut selector = Selector::new(records);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = run_loop(&mut terminal, &mut selector);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result?;
    if matches!(selector.state(), SelectorState::Cancelled) {
        tracing::debug!("selection cancelled");
    }
    Ok(selector.into_selection())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    selector: &mut Selector,
) -> Result<()> {
    while !selector.is_terminal() {
        terminal.draw(|frame| draw(frame, selector))?;
        if let Event::Key(key) = event::read().context("read terminal input")? {
            if let Some(event) = map_key(key) {
                selector.update(event);
            }
        }
    }
    Ok(())
}

fn map_key(key: KeyEvent) -> Option<SelectorEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(SelectorEvent::Quit);
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(SelectorEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(SelectorEvent::MoveDown),
        KeyCode::Enter => Some(SelectorEvent::Confirm),
        KeyCode::Char('q') | KeyCode::Esc => Some(SelectorEvent::Quit),
        _ => None,
    }
}

fn draw(frame: &mut Frame<'_>, selector: &Selector) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new("Select a host to connect:"), chunks[0]);

    // The highlight symbol shifts list rows by two columns; the header
    // carries the same lead-in so the columns line up.
    let header = format!(
        "  {:<NAME_WIDTH$} {:<USER_WIDTH$} {:<PORT_WIDTH$} {}",
        "Host", "User", "Port", "Source"
    );
    frame.render_widget(
        Paragraph::new(header).style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[1],
    );

    let items: Vec<ListItem> = selector
        .records()
        .iter()
        .map(|record| ListItem::new(record_line(record)))
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[2], &mut list_state(selector));

    frame.render_widget(
        Paragraph::new("up/down or k/j to move, Enter to connect, q to quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

/// The list scroll state is rebuilt from the selector on every frame;
/// drawing holds no state of its own.
fn list_state(selector: &Selector) -> ListState {
    let mut state = ListState::default();
    state.select(selector.cursor());
    state
}

fn record_line(record: &HostRecord) -> String {
    format!(
        "{:<NAME_WIDTH$} {:<USER_WIDTH$} {:<PORT_WIDTH$} {}",
        record.name, record.username, record.port, record.source
    )
}
