//! Splash Screen
//!
//! Loading screen shown during initialization.

use crate::theme::{rgb, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Splash screen state
pub struct SplashState {
    message: String,
    completed_steps: usize,
    total_steps: usize,
}

impl SplashState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            message: "Starting...".to_string(),
            completed_steps: 0,
            total_steps: total_steps.max(1),
        }
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub fn complete_step(&mut self) {
        self.completed_steps = (self.completed_steps + 1).min(self.total_steps);
    }

    fn progress(&self) -> f64 {
        self.completed_steps as f64 / self.total_steps as f64
    }
}

pub fn render(f: &mut Frame, state: &SplashState, theme: &Theme) {
    let area = f.area();
    let primary = Style::default().fg(rgb(theme.base.primary));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(10),
            Constraint::Percentage(35),
        ])
        .split(area);

    let center = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(chunks[1])[1];

    let logo = vec![
        Line::from(Span::styled("  _       _       _     ", primary)),
        Line::from(Span::styled(" | |_ ___| |_  _ | |__  ", primary)),
        Line::from(Span::styled(" |  _/ __| | || || '_ \\ ", primary)),
        Line::from(Span::styled("  \\__\\___|_|\\_,_||_.__/ ", primary)),
        Line::from(""),
        Line::from(Span::styled(
            "Football club admin console",
            Style::default()
                .fg(rgb(theme.base.foreground))
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let logo_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.base.border)));

    let inner = logo_block.inner(center);
    f.render_widget(logo_block, center);

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    let logo_para = Paragraph::new(logo).alignment(Alignment::Center);
    f.render_widget(logo_para, inner_chunks[0]);

    let progress = Gauge::default()
        .gauge_style(primary)
        .percent((state.progress() * 100.0) as u16)
        .label(Span::styled(
            state.message.as_str(),
            Style::default().fg(rgb(theme.base.foreground)),
        ));

    f.render_widget(progress, inner_chunks[1]);
}
