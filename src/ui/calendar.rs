//! Calendar Screen
//!
//! Agenda of the visible month, week or day, plus the event detail popup.

use super::{centered_rect, truncate_string};
use crate::app::App;
use crate::calendar::{agenda, format_date_time};
use crate::page::LoadState;
use crate::theme::rgb;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.base.border)))
        .title(Span::styled(
            format!(" {} · {} ", app.calendar.title(), app.calendar.view.name()),
            Style::default()
                .fg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.events.load_state() != LoadState::Ready {
        let msg = Paragraph::new("Loading events...")
            .style(Style::default().fg(rgb(theme.base.warning)))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner);
        return;
    }

    let entries = app.calendar_entries();
    let (from, to) = app.calendar.range();
    let days = agenda(&entries, from, to);

    if days.is_empty() {
        let msg = Paragraph::new("No events in this range. Press n to schedule one.")
            .style(Style::default().fg(rgb(theme.base.muted)))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner);
        return;
    }

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = None;
    let mut entry_idx = 0;

    for (day, list) in &days {
        items.push(ListItem::new(Line::from(Span::styled(
            day.format("%A %d/%m/%Y").to_string(),
            Style::default()
                .fg(rgb(theme.base.secondary))
                .add_modifier(Modifier::BOLD),
        ))));

        for entry in list {
            if entry_idx == app.calendar.selected {
                selected_row = Some(items.len());
            }
            entry_idx += 1;

            let time = format!(
                "  {}-{} ",
                entry.start.format("%H:%M"),
                entry.end.format("%H:%M")
            );
            let location = if entry.location.is_empty() {
                String::new()
            } else {
                format!("  @ {}", entry.location)
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(time, Style::default().fg(rgb(theme.base.muted))),
                Span::styled("● ", Style::default().fg(rgb(entry.color))),
                Span::styled(
                    truncate_string(&entry.title, 32),
                    Style::default()
                        .fg(rgb(theme.base.foreground))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(location, Style::default().fg(rgb(theme.base.info))),
                Span::styled(
                    format!("  [{}]", entry.teams_label()),
                    Style::default().fg(rgb(theme.base.muted)),
                ),
            ])));
        }
    }

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(rgb(theme.table.selected_bg))
            .fg(rgb(theme.table.selected_fg)),
    );
    let mut state = ListState::default();
    state.select(selected_row);
    f.render_stateful_widget(list, inner, &mut state);
}

/// Popup with the selected event's details
pub fn render_detail(f: &mut Frame, app: &App) {
    let Some(entry) = app.selected_entry() else {
        return;
    };
    let theme = &app.theme;
    let label = Style::default().fg(rgb(theme.base.muted));
    let value = Style::default().fg(rgb(theme.base.foreground));

    let popup_area = centered_rect(50, 45, f.area());
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(entry.color)))
        .style(Style::default().bg(rgb(theme.dialog.background)))
        .title(Span::styled(
            format!(" {} ", entry.title),
            Style::default()
                .fg(rgb(entry.color))
                .add_modifier(Modifier::BOLD),
        ));

    let row = |name: &'static str, text: String| {
        Line::from(vec![
            Span::styled(format!(" {:<10}", name), label),
            Span::styled(text, value),
        ])
    };

    let lines = vec![
        Line::from(""),
        row("Type", entry.event_type.as_str().to_string()),
        row("Start", format_date_time(&entry.start)),
        row("End", format_date_time(&entry.end)),
        row("Location", entry.location.clone()),
        row("Teams", entry.teams_label()),
        row("Coach", entry.coach_label().to_string()),
        Line::from(""),
        Line::from(Span::styled(" e: edit  x: delete  Esc: close", label)),
    ];

    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}
