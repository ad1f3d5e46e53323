//! Play command implementation - Interactive TUI.
//!
//! The session resolves each intent at once; this module replays the
//! returned events onto its own copy of the grid, honouring their delays.
//! Input is ignored while a replay is outstanding.

use super::{CliError, GridArgs, resolve_seed};
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use labyrinth::game::{Event, Intent, Refusal, Resolution, TimedEvent, WarningKind};
use labyrinth::{CellKind, Coord, GameStatus, Grid, Session, Xorshift64};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::VecDeque;
use std::io::stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Messages kept in the side panel.
const MESSAGE_LIMIT: usize = 12;

/// Input poll interval.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the TUI fails.
pub(crate) fn execute(grid: GridArgs, seed: Option<u64>) -> Result<(), CliError> {
    let config = grid.session_config()?;
    let seed = resolve_seed(seed);

    let mut rng = Xorshift64::new(seed);
    let session = Session::new(config, &mut rng)?;
    info!(seed, "interactive session started");

    let app = App::new(session, rng, seed);
    run_tui(app)
}

/// Values shown in the status panel, updated as events replay.
#[derive(Debug, Clone, Copy)]
struct Hud {
    health: i32,
    energy: i32,
    medal_count: u32,
}

/// App state for the TUI.
struct App {
    session: Session,
    rng: Xorshift64,
    seed: u64,
    /// What the player currently sees; lags the session during a replay.
    view: Grid,
    hud: Hud,
    pending: VecDeque<TimedEvent>,
    next_due: Instant,
    messages: VecDeque<(String, Color)>,
    started: Instant,
    /// Frozen play time once the session ends.
    finished_after: Option<Duration>,
}

impl App {
    fn new(session: Session, rng: Xorshift64, seed: u64) -> Self {
        let view = session.grid.clone();
        let hud = Self::fresh_hud(&session);
        Self {
            session,
            rng,
            seed,
            view,
            hud,
            pending: VecDeque::new(),
            next_due: Instant::now(),
            messages: VecDeque::new(),
            started: Instant::now(),
            finished_after: None,
        }
    }

    fn fresh_hud(session: &Session) -> Hud {
        let res = &session.resources;
        Hud {
            health: res.health,
            energy: res.energy,
            medal_count: res.medal_count,
        }
    }

    fn is_replaying(&self) -> bool {
        !self.pending.is_empty()
    }

    fn elapsed(&self) -> Duration {
        self.finished_after
            .unwrap_or_else(|| self.started.elapsed())
    }

    fn note(&mut self, message: impl Into<String>, color: Color) {
        if self.messages.len() == MESSAGE_LIMIT {
            self.messages.pop_front();
        }
        self.messages.push_back((message.into(), color));
    }

    fn offer(&mut self, intent: Intent) {
        match self.session.apply(intent, &mut self.rng) {
            Resolution::Refused(Refusal::InsufficientEnergy { needed, available }) => {
                self.note(
                    format!("Not enough energy for {intent}: {available}/{needed}"),
                    Color::Yellow,
                );
            }
            Resolution::Refused(Refusal::SessionOver { .. }) => {}
            Resolution::Applied(events) => {
                debug!(%intent, events = events.len(), "queued for replay");
                if let Some(first) = events.first() {
                    self.next_due = Instant::now() + first.delay;
                }
                self.pending.extend(events);
            }
        }

        if !self.session.is_playing() && self.finished_after.is_none() {
            self.finished_after = Some(self.started.elapsed());
        }
    }

    fn restart(&mut self) -> Result<(), CliError> {
        self.session.restart(&mut self.rng)?;
        self.view = self.session.grid.clone();
        self.hud = Self::fresh_hud(&self.session);
        self.pending.clear();
        self.messages.clear();
        self.started = Instant::now();
        self.finished_after = None;
        info!("session restarted");
        Ok(())
    }

    /// Apply every event whose delay has elapsed.
    fn tick(&mut self) {
        let now = Instant::now();
        while now >= self.next_due {
            let Some(timed) = self.pending.pop_front() else {
                break;
            };
            self.show(timed.event);
            if let Some(next) = self.pending.front() {
                self.next_due = now + next.delay;
            }
        }
    }

    fn show(&mut self, event: Event) {
        match event {
            Event::CellChanged { pos, kind } => {
                self.view.set(pos, kind);
            }
            Event::ResourceChanged {
                health,
                energy,
                medal_count,
            } => {
                self.hud = Hud {
                    health,
                    energy,
                    medal_count,
                };
            }
            Event::Warning { kind } => {
                let text = match kind {
                    WarningKind::TooMuchCoffee => "Too much coffee! Wait a few moves.",
                    WarningKind::OverHeal => "You are already healthy enough.",
                };
                self.note(text, Color::Yellow);
            }
            Event::Defeat { cause } => {
                self.note(format!("Defeated: {cause:?}"), Color::Red);
            }
            Event::Victory { cause } => {
                self.note(format!("Victory: {cause:?}"), Color::Green);
            }
            Event::EnemySpawned { pos } => {
                self.view.set(pos, CellKind::Enemy);
                self.note(format!("An enemy appeared at {pos}"), Color::Magenta);
            }
        }
    }
}

fn intent_for(code: KeyCode) -> Option<Intent> {
    Some(match code {
        KeyCode::Up => Intent::MoveUp,
        KeyCode::Down => Intent::MoveDown,
        KeyCode::Left => Intent::MoveLeft,
        KeyCode::Right => Intent::MoveRight,
        KeyCode::Tab => Intent::Shoot,
        KeyCode::BackTab | KeyCode::Char('s' | 'S') => Intent::ShiftAttack,
        KeyCode::Enter => Intent::PlaceBomb,
        KeyCode::Char(' ') => Intent::Detonate,
        _ => return None,
    })
}

fn run_tui(app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<(), CliError> {
    loop {
        app.tick();
        terminal.draw(|f| ui(f, &app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            _ if app.is_replaying() => {}
            KeyCode::Enter if !app.session.is_playing() => app.restart()?,
            code => {
                if let Some(intent) = intent_for(code) {
                    app.offer(intent);
                }
            }
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_grid(f, main_chunks[0], app);
    render_stats(f, main_chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let status = match app.session.status {
        _ if app.is_replaying() => "...",
        GameStatus::Playing => "PLAYING",
        GameStatus::Defeated => "DEFEATED",
        GameStatus::Victorious => "ESCAPED",
    };

    let title = format!(
        " Labyrinth | Seed {} | {}x{} | {} ",
        app.seed,
        app.view.columns(),
        app.view.rows(),
        status
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn cell_color(kind: CellKind) -> Color {
    match kind {
        CellKind::Hall => Color::DarkGray,
        CellKind::Wall => Color::Gray,
        CellKind::Medal => Color::Yellow,
        CellKind::Enemy => Color::Red,
        CellKind::Hero => Color::Cyan,
        CellKind::Heal => Color::Green,
        CellKind::Coffee => Color::LightYellow,
        CellKind::Bullet => Color::White,
        CellKind::Bomb => Color::LightRed,
    }
}

fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let grid = &app.view;

    // Show the portion of the grid that fits
    let visible_width = area.width.saturating_sub(2).min(grid.columns());
    let visible_height = area.height.saturating_sub(2).min(grid.rows());

    let lines: Vec<Line> = (0..visible_height)
        .map(|y| {
            let spans: Vec<Span> = (0..visible_width)
                .map(|x| match grid.get(Coord::new(x, y)) {
                    Some(kind) => Span::styled(
                        kind.glyph().to_string(),
                        Style::default().fg(cell_color(kind)),
                    ),
                    None => Span::raw(" "),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Maze "));
    f.render_widget(widget, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let res = &app.session.resources;
    let elapsed = app.elapsed().as_secs();

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Health  ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(app.hud.health.to_string(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("Energy  ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(app.hud.energy.to_string(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(format!(
            "Medals  {}/{}",
            app.hud.medal_count, res.total_medals
        )),
        Line::from(format!("Coffee  {} moves", res.energy_usage_cooldown)),
        Line::from(format!("Steps   {}", res.total_steps)),
        Line::from(format!("Bombs   {}", app.session.bombs.len())),
        Line::from(format!("Time    {:02}:{:02}", elapsed / 60, elapsed % 60)),
        Line::from(""),
    ];

    for (message, color) in &app.messages {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(*color),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Hero "))
        .wrap(Wrap { trim: false });

    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.session.is_playing() {
        " [←↑↓→] Move  [Tab] Shoot  [s] Shift attack  [Enter] Bomb  [Space] Detonate  [q] Quit "
    } else {
        " [Enter] New level  [q] Quit "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth::SessionConfig;

    fn app() -> App {
        let mut rng = Xorshift64::new(11);
        let session = Session::new(SessionConfig::default(), &mut rng).unwrap();
        App::new(session, rng, 11)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(intent_for(KeyCode::Tab), Some(Intent::Shoot));
        assert_eq!(intent_for(KeyCode::BackTab), Some(Intent::ShiftAttack));
        assert_eq!(intent_for(KeyCode::Enter), Some(Intent::PlaceBomb));
        assert_eq!(intent_for(KeyCode::Char(' ')), Some(Intent::Detonate));
        assert_eq!(intent_for(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_replay_catches_view_up() {
        let mut app = app();
        app.offer(Intent::MoveRight);
        assert!(app.is_replaying());

        // Movement events carry no delay
        app.tick();
        assert!(!app.is_replaying());
        assert_eq!(app.view, app.session.grid);
        assert_eq!(app.hud.energy, 499);
    }

    #[test]
    fn test_restart_resets_view() {
        let mut app = app();
        app.session.status = GameStatus::Defeated;
        app.note("lost", Color::Red);
        app.restart().unwrap();

        assert!(app.session.is_playing());
        assert!(app.messages.is_empty());
        assert_eq!(app.view, app.session.grid);
        assert_eq!(app.hud.energy, 500);
    }
}
