//! Terminal User Interface rendering module
//!
//! Renders the club console with ratatui: a header, the table or agenda of
//! the current view, a one-line status bar, and overlays for the current
//! mode.
//!
//! # Architecture
//!
//! - [`splash`] - Startup splash screen
//! - `header` - API URL, view and record counts
//! - `calendar` - Event agenda and event detail popup
//! - `form` - Create/edit form overlay
//! - `help` - Help overlay showing keybindings
//! - `dialog` - Delete confirmation and warnings
//! - `command_box` - Command mode input (`:` key)
//!
//! Every color comes from the resolved [`Theme`](crate::theme::Theme) held
//! by the app.

mod calendar;
mod command_box;
mod dialog;
mod form;
mod header;
mod help;
pub mod splash;

use crate::app::{App, Mode, View};
use crate::page::{resolve_labels, LoadState, MessageKind};
use crate::resource::{
    collect_ids, extract_json_value, format::lookup, format_cell, get_color_for_value, ColumnDef,
};
use crate::theme::{rgb, SyntaxColors};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, TableState,
    },
    Frame,
};
use serde_json::Value;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header
            Constraint::Min(1),    // Table, agenda or describe
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let background = Block::default().style(Style::default().bg(rgb(app.theme.base.background)));
    f.render_widget(background, f.area());

    header::render(f, app, chunks[0]);

    match (app.mode, app.view) {
        (Mode::Describe, _) => render_describe_view(f, app, chunks[1]),
        (_, View::Calendar) => calendar::render(f, app, chunks[1]),
        _ => render_dynamic_table(f, app, chunks[1]),
    }

    render_crumb(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Help => help::render(f, app),
        Mode::Confirm | Mode::Warning => dialog::render(f, app),
        Mode::Command => command_box::render(f, app),
        Mode::Form => form::render(f, app),
        Mode::EventDetail => calendar::render_detail(f, app),
        _ => {},
    }
}

/// Table for the current resource, driven by its column definitions
fn render_dynamic_table(f: &mut Frame, app: &App, area: Rect) {
    let page = app.page_view();
    let resource = page.def();
    let theme = &app.theme;

    let title = format!(
        " {}[{}] {} ",
        resource.display_name,
        page.len(),
        page.pager().label(page.len())
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.base.border)))
        .title(Span::styled(
            title,
            Style::default()
                .fg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if page.load_state() != LoadState::Ready {
        let msg = Paragraph::new(format!("Loading {}...", resource.display_name.to_lowercase()))
            .style(Style::default().fg(rgb(theme.base.warning)))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    if page.is_empty() {
        let msg = Paragraph::new(format!(
            "No {} yet. Press c to add one.",
            resource.display_name.to_lowercase()
        ))
        .style(Style::default().fg(rgb(theme.base.muted)))
        .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    let rows_data = page.visible_rows();
    let visible_height = (inner_area.height as usize).saturating_sub(1);
    let needs_scrollbar = rows_data.len() > visible_height;

    let table_area = if needs_scrollbar {
        Rect {
            width: inner_area.width.saturating_sub(1),
            ..inner_area
        }
    } else {
        inner_area
    };

    let header_cells: Vec<Cell> = resource
        .columns
        .iter()
        .map(|col| {
            Cell::from(format!(" {}", col.header)).style(
                Style::default()
                    .fg(rgb(theme.table.header))
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = rows_data
        .iter()
        .map(|item| {
            let cells = resource.columns.iter().map(|col| {
                let value = cell_text(app, item, col);
                let style = get_cell_style(app, item, col);
                Cell::from(format!(" {}", truncate_string(&value, 38))).style(style)
            });
            Row::new(cells.collect::<Vec<_>>())
        })
        .collect();

    let widths: Vec<Constraint> = resource
        .columns
        .iter()
        .map(|col| Constraint::Percentage(col.width))
        .collect();

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(rgb(theme.table.selected_bg))
            .fg(rgb(theme.table.selected_fg))
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.selected.min(rows_data.len().saturating_sub(1))));
    f.render_stateful_widget(table, table_area, &mut state);

    if needs_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state =
            ScrollbarState::new(rows_data.len().saturating_sub(visible_height)).position(app.selected);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Display text of one cell
///
/// Lookup columns name the referenced records from the reference lists;
/// before those are loaded the embedded value is shown as is.
pub(crate) fn cell_text(app: &App, item: &Value, col: &ColumnDef) -> String {
    if let Some(key) = col.lookup.as_deref() {
        let ids = lookup(item, &col.json_path)
            .map(collect_ids)
            .unwrap_or_default();
        let options = app.references.get(key);
        if !ids.is_empty() && !options.is_empty() {
            return resolve_labels(&ids, options).join(", ");
        }
    }
    let raw = extract_json_value(item, &col.json_path);
    if raw == "-" {
        return raw;
    }
    format_cell(&raw, col.format)
}

fn get_cell_style(app: &App, item: &Value, col: &ColumnDef) -> Style {
    let base = Style::default().fg(rgb(app.theme.base.foreground));
    if let Some(ref color_map_name) = col.color_map {
        let raw = extract_json_value(item, &col.json_path);
        if let Some(color) = get_color_for_value(color_map_name, &raw) {
            return base.fg(rgb(color));
        }
    }
    base
}

/// Truncate string for display (Unicode-safe)
pub(crate) fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

fn render_describe_view(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let json = app
        .describe_json()
        .unwrap_or_else(|| "No record selected".to_string());

    let lines: Vec<Line> = json
        .lines()
        .map(|l| highlight_json_line(l, &theme.syntax))
        .collect();
    let total_lines = lines.len();

    let title = format!(" {} Details ", app.page_view().def().display_name);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.base.primary)))
        .title(Span::styled(
            title,
            Style::default()
                .fg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let visible_lines = inner_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.describe_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    f.render_widget(paragraph, inner_area);

    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll + visible_lines).position(scroll);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Apply JSON syntax highlighting to a single pretty-printed line
fn highlight_json_line(line: &str, colors: &SyntaxColors) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = line.chars().peekable();
    let mut current = String::new();

    let flush = |current: &mut String, spans: &mut Vec<Span<'static>>| {
        if !current.is_empty() {
            spans.push(Span::styled(
                current.clone(),
                json_value_style(current, colors),
            ));
            current.clear();
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                flush(&mut current, &mut spans);

                let mut string_content = String::from("\"");
                while let Some(next_c) = chars.next() {
                    string_content.push(next_c);
                    match next_c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                string_content.push(escaped);
                            }
                        },
                        '"' => break,
                        _ => {},
                    }
                }

                // A string directly followed by ':' is an object key
                let is_key = chars.peek() == Some(&':');
                let color = if is_key { colors.key } else { colors.string };
                spans.push(Span::styled(string_content, Style::default().fg(rgb(color))));
            },
            ':' | ',' | '{' | '}' | '[' | ']' => {
                flush(&mut current, &mut spans);
                spans.push(Span::raw(c.to_string()));
            },
            ' ' | '\t' => {
                flush(&mut current, &mut spans);
                spans.push(Span::raw(c.to_string()));
            },
            _ => {
                current.push(c);
            },
        }
    }
    flush(&mut current, &mut spans);

    Line::from(spans)
}

/// Style for bare JSON values (numbers, booleans, null)
fn json_value_style(value: &str, colors: &SyntaxColors) -> Style {
    let trimmed = value.trim();
    let color = if trimmed == "null" {
        colors.null
    } else if trimmed == "true" || trimmed == "false" {
        colors.boolean
    } else if trimmed.parse::<f64>().is_ok() {
        colors.number
    } else {
        return Style::default();
    };
    Style::default().fg(rgb(color))
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let page = app.page_view();

    let hints = match (app.mode, app.view) {
        (Mode::Describe, _) => "j/k: scroll | q/d/Esc: back",
        (Mode::Form, _) => "Tab: next field | ←/→: choose | Space: toggle | Enter: save | Esc: cancel",
        (_, View::Calendar) => "h/l: prev/next | t: today | v: view | n: new | </>: ±1 day | +/-: ±1 hour",
        _ => "[/]: page | c: new | e: edit | x: delete | R: refresh",
    };

    let (status_text, style) = if app.loading {
        (
            "Loading...".to_string(),
            Style::default().fg(rgb(theme.base.warning)),
        )
    } else if let Some(message) = page.message() {
        let color = match message.kind {
            MessageKind::Success => theme.base.success,
            MessageKind::Failure => theme.base.error,
        };
        (
            message.to_string(),
            Style::default().fg(rgb(color)).add_modifier(Modifier::BOLD),
        )
    } else {
        (hints.to_string(), Style::default().fg(rgb(theme.base.muted)))
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", app.view.key()),
            Style::default()
                .fg(rgb(theme.base.background))
                .bg(rgb(theme.base.primary)),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
    ]);

    f.render_widget(Paragraph::new(crumb), area);
}

/// Rectangle centered in `r`, sized in percent
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClubApi;
    use crate::config::Config;
    use crate::model::SelectOption;
    use crate::resource::get_resource;
    use crate::theme::Theme;
    use serde_json::json;

    fn app() -> App {
        let api = ClubApi::new("http://localhost:3000").unwrap();
        App::new(api, View::Teams, Config::default(), Theme::default(), false)
    }

    fn column(resource: &str, header: &str) -> &'static ColumnDef {
        get_resource(resource)
            .unwrap()
            .columns
            .iter()
            .find(|c| c.header == header)
            .unwrap()
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("U12 Reds", 20), "U12 Reds");
        assert_eq!(truncate_string("Ümlaut-Ümlaut", 8), "Ümlau...");
    }

    #[test]
    fn test_lookup_column_uses_references() {
        let mut app = app();
        let team = json!({"id": 1, "name": "U12 Reds", "coachId": 4, "students": [3, {"id": 9}]});

        // Without references the raw value is shown
        assert_eq!(cell_text(&app, &team, column("teams", "COACH")), "4");

        app.references.coaches = vec![SelectOption::new(4, "Marta")];
        app.references.students = vec![SelectOption::new(3, "Lea")];
        assert_eq!(cell_text(&app, &team, column("teams", "COACH")), "Marta");
        assert_eq!(cell_text(&app, &team, column("teams", "STUDENTS")), "Lea, #9");
    }

    #[test]
    fn test_date_column_is_formatted() {
        let app = app();
        let student = json!({"id": 2, "name": "Lea", "dateOfBirth": "2014-03-09"});
        assert_eq!(cell_text(&app, &student, column("students", "BORN")), "09/03/2014");
        assert_eq!(cell_text(&app, &json!({"id": 3}), column("students", "BORN")), "-");
    }

    #[test]
    fn test_highlight_marks_keys_and_values() {
        let colors = SyntaxColors::default();
        let line = highlight_json_line(r#"  "name": "U12 \"Reds\"","#, &colors);
        let texts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(texts.contains(&"\"name\""));
        assert!(texts.contains(&r#""U12 \"Reds\"""#));

        let key = line.spans.iter().find(|s| s.content == "\"name\"").unwrap();
        assert_eq!(key.style.fg, Some(rgb(colors.key)));
    }
}
