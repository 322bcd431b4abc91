//! Dialog Components
//!
//! Delete confirmation and warning dialogs.

use super::centered_rect;
use crate::app::{App, Mode};
use crate::theme::rgb;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    match app.mode {
        Mode::Confirm => render_confirm_dialog(f, app),
        Mode::Warning => render_warning_dialog(f, app),
        _ => {},
    }
}

fn render_confirm_dialog(f: &mut Frame, app: &App) {
    let page = app.page_view();
    let Some(id) = page.pending_delete() else {
        return;
    };
    let colors = &app.theme.dialog;

    let popup_area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, popup_area);

    let destructive = rgb(colors.destructive);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(destructive))
        .style(Style::default().bg(rgb(colors.background)))
        .title(Span::styled(
            format!(" Delete {} ", page.def().entity_name),
            Style::default().fg(destructive).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(inner);

    // Name the record when it is still listed
    let label = page
        .row_by_id(id)
        .and_then(|row| {
            row.get(page.def().name_field.as_str())
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("#{}", id));

    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            page.delete_prompt(),
            Style::default().fg(rgb(app.theme.base.foreground)),
        )),
        Line::from(Span::styled(
            label,
            Style::default()
                .fg(rgb(app.theme.base.foreground))
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(message, content_chunks[0]);

    let selected = Style::default()
        .fg(rgb(app.theme.base.background))
        .add_modifier(Modifier::BOLD);
    let unselected = Style::default().fg(rgb(app.theme.base.muted)).bg(rgb(colors.button_bg));

    let yes_style = if app.confirm_yes {
        selected.bg(destructive)
    } else {
        unselected
    };
    let no_style = if !app.confirm_yes {
        selected.bg(rgb(colors.button_selected))
    } else {
        unselected
    };

    let buttons = Line::from(vec![
        Span::raw("  "),
        Span::styled(" Delete (y) ", yes_style),
        Span::raw("    "),
        Span::styled(" Cancel (n) ", no_style),
        Span::raw("  "),
    ]);

    let buttons_para = Paragraph::new(buttons).alignment(Alignment::Center);
    f.render_widget(buttons_para, content_chunks[2]);
}

fn render_warning_dialog(f: &mut Frame, app: &App) {
    let Some(message) = &app.warning_message else {
        return;
    };
    let warning = rgb(app.theme.base.warning);

    let popup_area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(warning))
        .style(Style::default().bg(rgb(app.theme.dialog.background)))
        .title(Span::styled(
            " Warning ",
            Style::default().fg(warning).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(rgb(app.theme.base.foreground)),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter or Esc to close",
            Style::default().fg(rgb(app.theme.base.muted)),
        )),
    ];

    let paragraph = Paragraph::new(content).alignment(Alignment::Center);
    f.render_widget(paragraph, inner);
}
