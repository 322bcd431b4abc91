//! Command Box
//!
//! Command input with autocomplete.

use crate::app::App;
use crate::theme::rgb;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let primary = rgb(theme.base.primary);
    let foreground = Style::default().fg(rgb(theme.base.foreground));
    let muted = Style::default().fg(rgb(theme.base.muted));

    // Command box at bottom of screen
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(12)])
        .split(f.area());

    let command_area = chunks[1];
    f.render_widget(Clear, command_area);

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(command_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(primary))
        .title(Span::styled(
            " Command ",
            Style::default().fg(primary).add_modifier(Modifier::BOLD),
        ));

    // Typed text followed by the rest of the preview as ghost text
    let mut input_spans = vec![
        Span::styled(":", Style::default().fg(primary)),
        Span::styled(app.command_text.as_str(), foreground),
    ];
    if let Some(remaining) = app
        .command_preview
        .as_deref()
        .and_then(|p| p.strip_prefix(app.command_text.as_str()))
    {
        input_spans.push(Span::styled(remaining, muted));
    }

    let input_para = Paragraph::new(Line::from(input_spans)).block(input_block);
    f.render_widget(input_para, inner_chunks[0]);

    let suggestions_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.base.border)))
        .title(Span::styled(
            " Suggestions (↑/↓ to select, Tab to complete) ",
            muted,
        ));

    let suggestions: Vec<ListItem> = app
        .command_suggestions
        .iter()
        .enumerate()
        .take(8)
        .map(|(i, cmd)| {
            let style = if i == app.command_suggestion_selected {
                Style::default()
                    .fg(rgb(theme.base.background))
                    .bg(primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                foreground
            };
            ListItem::new(Span::styled(format!("  {}", cmd), style))
        })
        .collect();

    let suggestions_list = List::new(suggestions).block(suggestions_block);
    f.render_widget(suggestions_list, inner_chunks[1]);
}
