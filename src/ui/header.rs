//! Header Component
//!
//! Displays the API endpoint, the current view and its record counts.

use crate::app::{App, View};
use crate::theme::rgb;
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let muted = Style::default().fg(rgb(theme.base.muted));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.base.border)))
        .title(Span::styled(
            format!(" tclub v{} ", VERSION),
            Style::default()
                .fg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Row 1: API and view
    let api_view = Line::from(vec![
        Span::styled(" API: ", muted),
        Span::styled(
            &app.api_url,
            Style::default()
                .fg(rgb(theme.base.info))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("View: ", muted),
        Span::styled(
            app.view.title(),
            Style::default()
                .fg(rgb(theme.base.secondary))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(api_view), rows[0]);

    // Row 2: counts for the current view
    let page = app.page_view();
    let mut counts = vec![
        Span::styled(" Records: ", muted),
        Span::styled(
            page.len().to_string(),
            Style::default().fg(rgb(theme.base.foreground)),
        ),
    ];
    if app.view == View::Calendar {
        counts.push(Span::raw("  "));
        counts.push(Span::styled("Showing: ", muted));
        counts.push(Span::styled(
            format!("{} ({})", app.calendar.title(), app.calendar.view.name()),
            Style::default().fg(rgb(theme.base.foreground)),
        ));
    } else {
        counts.push(Span::raw("  "));
        counts.push(Span::styled(page.pager().label(page.len()), muted));
    }
    f.render_widget(Paragraph::new(Line::from(counts)), rows[1]);

    // Row 3: view switcher and help hint
    let mut switcher: Vec<Span> = vec![Span::raw(" ")];
    for (idx, view) in View::ALL.iter().enumerate() {
        let style = if *view == app.view {
            Style::default()
                .fg(rgb(theme.base.background))
                .bg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD)
        } else {
            muted
        };
        switcher.push(Span::styled(format!(" {}:{} ", idx + 1, view.key()), style));
    }
    switcher.push(Span::styled("  ?:help  ::cmd  q:quit", muted));
    if app.readonly {
        switcher.push(Span::styled(
            "  [READ-ONLY]",
            Style::default()
                .fg(rgb(theme.base.warning))
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(switcher)), rows[2]);
}
