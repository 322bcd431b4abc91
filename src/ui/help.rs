//! Help Overlay
//!
//! Shows keyboard shortcuts.

use super::centered_rect;
use crate::app::App;
use crate::theme::rgb;
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k, ↑/↓", "Move up/down"),
            ("g/G", "Go to top/bottom"),
            ("[/]", "Previous/next page"),
            ("1-4, Tab", "Switch view"),
            ("R", "Reload current view"),
        ],
    ),
    (
        "Records",
        &[
            ("Enter/d", "Show record details"),
            ("c/n", "New record"),
            ("e", "Edit selected record"),
            ("x/Delete", "Delete selected record"),
        ],
    ),
    (
        "Forms",
        &[
            ("Tab/↑/↓", "Move between fields"),
            ("←/→", "Pick coach, type or option"),
            ("Space", "Toggle highlighted option"),
            ("Enter", "Save"),
            ("Esc", "Close form"),
        ],
    ),
    (
        "Calendar",
        &[
            ("h/l, ←/→", "Previous/next range"),
            ("t", "Jump to today"),
            ("v", "Cycle month/week/day"),
            ("Enter", "Event details"),
            ("</>", "Move event one day"),
            ("+/-", "Move event one hour"),
        ],
    ),
    (
        "Commands",
        &[
            (":", "Enter command mode"),
            (":teams", "Go to teams (also students, coaches, calendar)"),
            (":refresh", "Reload current view"),
            ("?/Esc", "Close help"),
            ("q, Ctrl+c", "Quit application"),
        ],
    ),
];

pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect(70, 80, f.area());

    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            *title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (key, action) in keys.iter() {
            help_text.push(Line::from(vec![
                Span::styled(
                    format!("  {:<12}", key),
                    Style::default().fg(rgb(theme.base.warning)),
                ),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(theme.base.primary)))
        .style(
            Style::default()
                .bg(rgb(theme.base.paper))
                .fg(rgb(theme.base.foreground)),
        )
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(rgb(theme.base.primary))
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}
