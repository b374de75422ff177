//! Application core: event loop, key handling, action dispatch, rendering.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use parkwatch_core::{
    BoardState, DisplayBoard, DisplayTarget, PollStats, PollerConfig, STATUS_PATH, StatusPoller,
};

use crate::action::Action;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::TerminalSession;
use crate::widgets::status_card::StatusCard;

/// Shown in every card until the first successful poll.
const PLACEHOLDER: &str = "--";

/// How long a card border stays highlighted after its value changed.
const HIGHLIGHT_FOR: Duration = Duration::from_millis(1500);

/// Redraw cadence for poll counters and relative times.
const CLOCK_RATE: Duration = Duration::from_millis(250);

/// Below this width the cards stack vertically.
const WIDE_LAYOUT_MIN: u16 = 60;

/// Top-level application state and event loop.
pub struct App {
    running: bool,
    help_visible: bool,
    /// Header label: lot name, profile name or server.
    label: String,
    poller: StatusPoller,
    board: Arc<DisplayBoard>,
    /// Last board state received through the bridge.
    state: BoardState,
    last_change: Option<(Instant, DateTime<Local>)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: PollerConfig, label: String) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let board = Arc::new(DisplayBoard::with_state(BoardState::placeholder(
            PLACEHOLDER,
        )));
        let poller = StatusPoller::new(config, board.clone())?;

        Ok(Self {
            running: true,
            help_visible: false,
            label,
            poller,
            state: board.state(),
            board,
            last_change: None,
            action_tx,
            action_rx,
        })
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::start()?;
        if let Ok((cols, rows)) = session.size() {
            debug!(cols, rows, "terminal size");
        }

        let cancel = CancellationToken::new();
        let poller = self.poller.start_with_cancel(cancel.child_token());
        tokio::spawn(spawn_data_bridge(
            self.board.subscribe(),
            self.action_tx.clone(),
            cancel.child_token(),
        ));
        let mut events = EventReader::spawn(CLOCK_RATE);

        info!("TUI event loop started");
        session.draw(|frame| self.render(frame))?;

        while self.running {
            let redraw = tokio::select! {
                event = events.next() => {
                    let Some(event) = event else { break };
                    match self.map_event(event) {
                        Some(action) => self.process_action(&action),
                        None => false,
                    }
                }
                Some(action) = self.action_rx.recv() => self.process_action(&action),
            };

            if redraw && self.running {
                session.draw(|frame| self.render(frame))?;
            }
        }

        events.stop();
        cancel.cancel();
        poller.stop().await;
        info!(stats = ?self.poller.stats(), "TUI event loop ended");
        Ok(())
    }

    fn map_event(&self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Resize(w, h) => Some(Action::Resize(w, h)),
            Event::Clock => Some(Action::Clock),
        }
    }

    /// Map a key event to an action.
    fn handle_key_event(&self, key: KeyEvent) -> Option<Action> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q') | KeyCode::Esc) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            _ => None,
        }
    }

    /// Apply an action. Returns whether the screen needs a redraw.
    fn process_action(&mut self, action: &Action) -> bool {
        match action {
            Action::Quit => {
                self.running = false;
                false
            }
            Action::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                true
            }
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
                true
            }
            Action::BoardUpdated(state) => {
                if *state == self.state {
                    return false;
                }
                debug!("board changed");
                self.state = state.clone();
                self.last_change = Some((Instant::now(), Local::now()));
                true
            }
            // Poll counters and "changed N ago" both advance with the clock.
            Action::Clock => true,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [header, cards, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header);
        self.render_cards(frame, cards);
        self.render_status_bar(frame, footer);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let endpoint = self
            .poller
            .config()
            .base_url
            .join(STATUS_PATH)
            .map_or_else(|_| self.poller.config().base_url.to_string(), |u| u.to_string());

        let line = Line::from(vec![
            Span::styled(" ◉ parkwatch ", theme::title_style()),
            Span::styled("│ ", theme::key_hint()),
            Span::styled(self.label.clone(), Style::default().fg(theme::ELECTRIC_PURPLE)),
            Span::styled(" │ ", theme::key_hint()),
            Span::styled(endpoint, theme::status_bar()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let direction = if area.width >= WIDE_LAYOUT_MIN {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let slots = Layout::default()
            .direction(direction)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(area);

        let highlighted = self
            .last_change
            .is_some_and(|(at, _)| at.elapsed() < HIGHLIGHT_FOR);

        let cards = [
            (DisplayTarget::Occupied, "Occupied", theme::CORAL),
            (DisplayTarget::Available, "Available", theme::SUCCESS_GREEN),
            (DisplayTarget::LastUpdated, "Last Updated", theme::NEON_CYAN),
        ];
        for ((target, title, accent), slot) in cards.into_iter().zip(slots.iter()) {
            let card = StatusCard::new(title, self.state.get(target), accent)
                .highlighted(highlighted);
            frame.render_widget(card, *slot);
        }
    }

    /// Bottom bar: poll counters, interval, time since last change.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let stats = self.poller.stats();
        let interval = humantime::format_duration(self.poller.config().poll_interval);

        let mut spans = vec![Span::raw(" ")];
        spans.extend(stats_spans(&stats));
        spans.push(Span::styled(format!(" │ every {interval}"), theme::status_bar()));
        spans.push(Span::styled(
            format!(" │ {}", self.last_change_text()),
            theme::status_bar(),
        ));
        spans.push(Span::styled(" │ ", theme::key_hint()));
        spans.push(Span::styled("?", theme::key_hint_key()));
        spans.push(Span::styled(" help  ", theme::key_hint()));
        spans.push(Span::styled("q", theme::key_hint_key()));
        spans.push(Span::styled(" quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn last_change_text(&self) -> String {
        match self.last_change {
            None => "waiting for first update".into(),
            Some((at, wall)) => {
                let ago = Duration::from_secs(at.elapsed().as_secs());
                format!(
                    "changed {} ago ({})",
                    humantime::format_duration(ago),
                    wall.format("%H:%M:%S")
                )
            }
        }
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width.saturating_sub(4));
        let height = 8u16.min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let help_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let lines = vec![
            Line::from(""),
            help_line("q / Esc", "quit"),
            help_line("Ctrl-C", "quit"),
            help_line("?", "toggle this help"),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), help_area);
    }
}

fn stats_spans(stats: &PollStats) -> Vec<Span<'static>> {
    let failed_style = if stats.failed > 0 {
        Style::default().fg(theme::ERROR_RED)
    } else {
        theme::status_bar()
    };
    vec![
        Span::styled(format!("polls {}", stats.attempts), theme::status_bar()),
        Span::styled(
            format!("  ok {}", stats.rendered),
            Style::default().fg(theme::SUCCESS_GREEN),
        ),
        Span::styled(format!("  failed {}", stats.failed), failed_style),
        Span::styled(
            format!("  in flight {}", stats.in_flight()),
            Style::default().fg(theme::ELECTRIC_YELLOW),
        ),
    ]
}

fn help_line<'a>(key: &'a str, what: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
        Span::styled(what, theme::status_bar()),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn app() -> App {
        let config = PollerConfig::new("http://127.0.0.1:5000".parse().unwrap());
        App::new(config, "North Garage".into()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn quit_keys() {
        let app = app();
        assert_eq!(app.handle_key_event(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(app.handle_key_event(key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(app.handle_key_event(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn esc_closes_help_before_quitting() {
        let mut app = app();
        assert!(app.process_action(&Action::ToggleHelp));
        assert_eq!(
            app.handle_key_event(key(KeyCode::Esc)),
            Some(Action::ToggleHelp)
        );
    }

    #[test]
    fn board_update_replaces_values() {
        let mut app = app();
        assert_eq!(app.state, BoardState::placeholder(PLACEHOLDER));
        assert!(app.last_change.is_none());

        let state = BoardState {
            occupied: "3".into(),
            available: "17".into(),
            last_updated: "2024-01-01T12:00:00Z".into(),
        };
        assert!(app.process_action(&Action::BoardUpdated(state.clone())));

        assert_eq!(app.state, state);
        assert!(app.last_change.is_some());
    }

    #[test]
    fn unchanged_board_skips_redraw() {
        let mut app = app();
        let placeholder = BoardState::placeholder(PLACEHOLDER);
        assert!(!app.process_action(&Action::BoardUpdated(placeholder)));
        assert!(app.last_change.is_none());
    }

    #[test]
    fn quit_stops_without_redraw() {
        let mut app = app();
        assert!(!app.process_action(&Action::Quit));
        assert!(!app.running);
    }

    #[test]
    fn clock_and_resize_map_to_redraws() {
        let mut app = app();
        let action = app.map_event(Event::Clock).unwrap();
        assert_eq!(action, Action::Clock);
        assert!(app.process_action(&action));

        let action = app.map_event(Event::Resize(120, 40)).unwrap();
        assert_eq!(action, Action::Resize(120, 40));
        assert!(app.process_action(&action));
    }

    #[test]
    fn renders_cards_header_and_footer() {
        let mut app = app();
        app.process_action(&Action::BoardUpdated(BoardState {
            occupied: "3".into(),
            available: "17".into(),
            last_updated: "2024-01-01 12:00".into(),
        }));

        let out = screen(&app, 100, 12);
        assert!(out.contains("North Garage"));
        assert!(out.contains("http://127.0.0.1:5000/status"));
        assert!(out.contains("Occupied"));
        assert!(out.contains("17"));
        assert!(out.contains("2024-01-01 12:00"));
        assert!(out.contains("every 1s"));
    }

    #[test]
    fn narrow_terminal_stacks_cards() {
        let out = screen(&app(), 40, 16);
        assert!(out.contains("Occupied"));
        assert!(out.contains("Available"));
        assert!(out.contains(PLACEHOLDER));
    }
}
