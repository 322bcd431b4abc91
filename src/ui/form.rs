//! Form Overlay
//!
//! Create and edit forms built from the resource's field definitions.

use super::centered_rect;
use crate::app::App;
use crate::page::{resolve_labels, FormTarget};
use crate::resource::{format_date, format_date_time, FieldDef, FieldKind};
use crate::theme::rgb;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let theme = &app.theme;
    let page = app.page_view();
    let def = page.def();
    let draft = page.draft(form.target);

    let title = match (form.target, page.editing()) {
        (FormTarget::Edit, Some(id)) => format!(" Edit {} #{} ", def.entity_name, id),
        _ => format!(" New {} ", def.entity_name),
    };

    let popup_area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.dialog.border)))
        .style(Style::default().bg(rgb(theme.dialog.background)))
        .title(Span::styled(
            title,
            Style::default()
                .fg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let label_style = Style::default().fg(rgb(theme.base.muted));
    let value_style = Style::default().fg(rgb(theme.base.foreground));
    let focus_style = Style::default()
        .fg(rgb(theme.base.primary))
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in def.fields.iter().enumerate() {
        let focused = idx == form.field;
        let marker = if field.required { "*" } else { " " };

        let mut spans = vec![
            Span::styled(if focused { "▶ " } else { "  " }, focus_style),
            Span::styled(
                format!("{:<14}{} ", field.label, marker),
                if focused { focus_style } else { label_style },
            ),
        ];

        if focused && !field.kind.is_option() {
            spans.push(Span::styled(form.input.clone(), value_style));
            spans.push(Span::styled("_", focus_style));
        } else if focused && matches!(field.kind, FieldKind::Select | FieldKind::Choice) {
            spans.push(Span::styled("◀ ", focus_style));
            spans.push(Span::styled(display_value(app, field, form.target), value_style));
            spans.push(Span::styled(" ▶", focus_style));
        } else {
            spans.push(Span::styled(display_value(app, field, form.target), value_style));
        }
        lines.push(Line::from(spans));

        // Focused multiselect lists every option with its checkbox
        if focused && field.kind == FieldKind::MultiSelect {
            let chosen = draft.ids(&field.key);
            let options = app.field_options(field);
            if options.is_empty() {
                lines.push(Line::from(Span::styled("      (no options loaded)", label_style)));
            }
            for (opt_idx, option) in options.iter().enumerate() {
                let checked = if chosen.contains(&option.id) { "[x]" } else { "[ ]" };
                let style = if opt_idx == form.option_cursor {
                    Style::default()
                        .fg(rgb(theme.table.selected_fg))
                        .bg(rgb(theme.table.selected_bg))
                } else {
                    value_style
                };
                lines.push(Line::from(Span::styled(
                    format!("      {} {}", checked, option.name),
                    style,
                )));
            }
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    // Validation or server failure stays visible under the fields
    let footer = match page.message() {
        Some(message) if message.is_failure() => Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(rgb(theme.base.error))
                .add_modifier(Modifier::BOLD),
        )),
        _ => Line::from(Span::styled(
            "Enter: save  Esc: close  * required",
            label_style,
        )),
    };
    f.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), chunks[1]);
}

/// Draft value of a field as shown when it is not being typed into
fn display_value(app: &App, field: &FieldDef, target: FormTarget) -> String {
    let draft = app.page_view().draft(target);
    let shown = match field.kind {
        FieldKind::Select => draft
            .id(&field.key)
            .map(|id| resolve_labels(&[id], app.field_options(field)).join("")),
        FieldKind::MultiSelect => {
            let ids = draft.ids(&field.key);
            (!ids.is_empty()).then(|| resolve_labels(&ids, app.field_options(field)).join(", "))
        },
        FieldKind::Date => draft.str(&field.key).map(format_date),
        FieldKind::DateTime => draft.str(&field.key).map(format_date_time),
        FieldKind::Text | FieldKind::Email | FieldKind::Choice => {
            draft.str(&field.key).map(str::to_string)
        },
    };
    shown
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "-".to_string())
}
