use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::warn;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::io::{Stderr, stderr};

use crate::game::{BoardView, Cell, ModeKind, Renderer};
use crate::metrics::GameMetrics;

/// What one grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Head,
    Body,
    Food,
    Empty,
}

impl Glyph {
    /// Head wins over body, body over food
    fn at(view: &BoardView<'_>, cell: Cell) -> Self {
        if cell == view.body.head() {
            Glyph::Head
        } else if view.body.occupies(cell) {
            Glyph::Body
        } else if cell == view.food {
            Glyph::Food
        } else {
            Glyph::Empty
        }
    }

    fn span(self) -> Span<'static> {
        let bold = Modifier::BOLD;
        match self {
            Glyph::Head => Span::styled("■ ", Style::default().fg(Color::Cyan).add_modifier(bold)),
            Glyph::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            Glyph::Food => Span::styled("O ", Style::default().fg(Color::Red).add_modifier(bold)),
            Glyph::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }
}

fn labelled(label: &'static str, value: String) -> [Span<'static>; 2] {
    [
        Span::styled(label, Style::default().fg(Color::Yellow)),
        Span::styled(value, Style::default().fg(Color::White)),
    ]
}

/// Turns a [`BoardView`] into ratatui widgets
pub struct Painter;

impl Painter {
    pub fn new() -> Self {
        Self
    }

    pub fn paint(&self, frame: &mut Frame, view: &BoardView<'_>, metrics: &GameMetrics) {
        let [header, board, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .areas(frame.area());

        frame.render_widget(self.stats(view, metrics), header);

        if view.terminated {
            frame.render_widget(self.game_over(view), board);
        } else {
            frame.render_widget(self.grid(view), board);
        }

        frame.render_widget(self.controls(view.kind), footer);
    }

    /// One line of two-character cells per board row
    pub fn grid_lines(&self, view: &BoardView<'_>) -> Vec<Line<'static>> {
        let board = view.board;
        (0..board.rows())
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..board.columns())
                    .map(|column| Glyph::at(view, board.cell_at(column, row)).span())
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn grid(&self, view: &BoardView<'_>) -> Paragraph<'static> {
        Paragraph::new(self.grid_lines(view))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .title(" Snack "),
            )
            .alignment(Alignment::Center)
    }

    fn stats(&self, view: &BoardView<'_>, metrics: &GameMetrics) -> Paragraph<'static> {
        let gap = || Span::raw("    ");
        let mut spans = Vec::new();
        spans.extend(labelled("Score: ", view.score.to_string()));
        spans.push(gap());
        spans.extend(labelled("Length: ", view.body.len().to_string()));
        spans.push(gap());
        spans.extend(labelled("Best: ", metrics.best_score().to_string()));
        spans.push(gap());
        spans.extend(labelled("Games: ", metrics.games().to_string()));
        spans.push(gap());
        spans.extend(labelled("Time: ", metrics.clock()));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn game_over(&self, view: &BoardView<'_>) -> Paragraph<'static> {
        let hint = match view.kind {
            ModeKind::Human => "Press R to play again",
            ModeKind::Autonomous => "Next episode starts shortly",
        };

        let text = vec![
            Line::from(""),
            Line::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::from(labelled("Final Score: ", view.score.to_string()).to_vec()),
            Line::from(""),
            Line::styled(hint, Style::default().fg(Color::Gray)),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn controls(&self, kind: ModeKind) -> Paragraph<'static> {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
        let line = match kind {
            ModeKind::Human => Line::from(vec![
                key("↑↓←→"),
                Span::raw(" / "),
                key("WASD"),
                Span::raw(" steer   "),
                key("R"),
                Span::raw(" restart   "),
                key("Q"),
                Span::raw(" quit"),
            ]),
            ModeKind::Autonomous => Line::from(vec![
                Span::raw("Agent playing   "),
                key("Q"),
                Span::raw(" stop"),
            ]),
        };

        Paragraph::new(line).alignment(Alignment::Center)
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws the simulation into the terminal's alternate screen
///
/// Construction switches the terminal into raw/alternate mode; dropping the
/// renderer switches it back.
pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    painter: Painter,
    metrics: GameMetrics,
    restored: bool,
}

impl TerminalRenderer {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        Ok(Self {
            terminal,
            painter: Painter::new(),
            metrics: GameMetrics::new(),
            restored: false,
        })
    }

    /// Leave the alternate screen. Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &BoardView<'_>) -> Result<()> {
        self.metrics.track(view);
        self.terminal
            .draw(|frame| self.painter.paint(frame, view, &self.metrics))
            .context("Failed to draw frame")?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!("failed to restore terminal: {err:#}");
        }
    }
}
