//! Event Handling
//!
//! Keyboard handling for tclub, one handler per mode.

use crate::app::{App, Mode, View};
use anyhow::Result;
use chrono::Duration;
use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers};

/// Handle events, returns true if app should quit
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(std::time::Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }
            return handle_key_event(app, key.code, key.modifiers).await;
        }
    }
    Ok(false)
}

pub async fn handle_key_event(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<bool> {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers).await,
        Mode::Command => handle_command_mode(app, code, modifiers).await,
        Mode::Help => handle_help_mode(app, code),
        Mode::Confirm => handle_confirm_mode(app, code).await,
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Describe => handle_describe_mode(app, code, modifiers),
        Mode::Form => handle_form_mode(app, code, modifiers).await,
        Mode::EventDetail => handle_event_detail_mode(app, code),
    }
}

async fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Calendar-only keys first
    if app.view == View::Calendar && handle_calendar_keys(app, code).await {
        return Ok(false);
    }

    match code {
        // Quit
        KeyCode::Char('q') => return Ok(true),

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home | KeyCode::Char('g') => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),

        // Views
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.switch_view(View::ALL[idx]).await;
        },
        KeyCode::Tab => {
            app.switch_view(app.view.next()).await;
        },

        // Pagination
        KeyCode::Char(']') => app.next_page(),
        KeyCode::Char('[') => app.prev_page(),

        // Refresh
        KeyCode::Char('R') => {
            app.refresh().await;
        },

        // Describe/Enter
        KeyCode::Enter | KeyCode::Char('d') if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.enter_describe_mode();
        },

        // Create, edit, delete
        KeyCode::Char('c') | KeyCode::Char('n') => app.enter_create_mode(),
        KeyCode::Char('e') => app.enter_edit_mode(),
        KeyCode::Char('x') | KeyCode::Delete => app.enter_confirm_mode(),

        // Command mode
        KeyCode::Char(':') => {
            app.enter_command_mode();
        },

        // Help
        KeyCode::Char('?') => {
            app.enter_help_mode();
        },

        _ => {},
    }

    Ok(false)
}

/// Keys that only mean something on the calendar; returns true when handled
async fn handle_calendar_keys(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('h') | KeyCode::Left => app.calendar_prev(),
        KeyCode::Char('l') | KeyCode::Right => app.calendar_next(),
        KeyCode::Char('t') => app.calendar.today(),
        KeyCode::Char('v') => app.calendar.cycle_view(),
        KeyCode::Enter => app.enter_event_detail(),
        KeyCode::Char('>') => app.move_selected_event(Duration::days(1)).await,
        KeyCode::Char('<') => app.move_selected_event(Duration::days(-1)).await,
        KeyCode::Char('+') => app.move_selected_event(Duration::hours(1)).await,
        KeyCode::Char('-') => app.move_selected_event(Duration::hours(-1)).await,
        _ => return false,
    }
    true
}

async fn handle_command_mode(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<bool> {
    match code {
        KeyCode::Esc => {
            app.exit_mode();
        },
        KeyCode::Enter => {
            let should_quit = app.execute_command().await;
            if app.mode == Mode::Command {
                app.exit_mode();
            }
            return Ok(should_quit);
        },
        KeyCode::Backspace => {
            app.command_text.pop();
            app.update_command_suggestions();
        },
        KeyCode::Tab | KeyCode::Right => {
            app.apply_suggestion();
        },
        KeyCode::Down => {
            app.next_suggestion();
        },
        KeyCode::Up => {
            app.prev_suggestion();
        },
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_text.push(c);
            app.update_command_suggestions();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

async fn handle_confirm_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.cancel_delete();
        },
        KeyCode::Left | KeyCode::Char('h') => {
            app.confirm_yes = true;
        },
        KeyCode::Right | KeyCode::Char('l') => {
            app.confirm_yes = false;
        },
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.confirm_delete().await;
        },
        KeyCode::Enter => {
            if app.confirm_yes {
                app.confirm_delete().await;
            } else {
                app.cancel_delete();
            }
        },
        _ => {},
    }
    Ok(false)
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.warning_message = None;
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_describe_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.exit_mode();
        },
        KeyCode::Char('j') | KeyCode::Down => {
            app.describe_scroll = app.describe_scroll.saturating_add(1);
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.describe_scroll = app.describe_scroll.saturating_sub(1);
        },
        KeyCode::PageDown => {
            app.describe_scroll = app.describe_scroll.saturating_add(10);
        },
        KeyCode::PageUp => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('d') => {
            if modifiers.contains(KeyModifiers::CONTROL) {
                app.describe_scroll = app.describe_scroll.saturating_add(10);
            } else {
                app.exit_mode();
            }
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('g') | KeyCode::Home => {
            app.describe_scroll = 0;
        },
        KeyCode::Char('G') | KeyCode::End => {
            app.describe_scroll_to_bottom(30); // Approximate visible lines
        },
        _ => {},
    }
    Ok(false)
}

async fn handle_form_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        KeyCode::Esc => {
            app.cancel_form();
        },
        KeyCode::Enter => {
            app.submit_form().await;
        },
        KeyCode::Tab | KeyCode::Down => {
            app.next_field();
        },
        KeyCode::BackTab | KeyCode::Up => {
            app.prev_field();
        },
        KeyCode::Left => {
            app.cycle_option(false);
        },
        KeyCode::Right => {
            app.cycle_option(true);
        },
        KeyCode::Backspace | KeyCode::Delete => {
            app.form_backspace();
        },
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.form_input_char(c);
        },
        _ => {},
    }
    Ok(false)
}

fn handle_event_detail_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
            app.exit_mode();
        },
        KeyCode::Char('e') => {
            app.exit_mode();
            app.enter_edit_mode();
        },
        KeyCode::Char('x') | KeyCode::Delete => {
            app.exit_mode();
            app.enter_confirm_mode();
        },
        _ => {},
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClubApi;
    use crate::config::Config;
    use crate::page::FormTarget;
    use crate::theme::Theme;

    fn app() -> App {
        let api = ClubApi::new("http://localhost:3000").unwrap();
        App::new(api, View::Coaches, Config::default(), Theme::default(), false)
    }

    #[tokio::test]
    async fn test_form_keys_fill_draft() {
        let mut app = app();
        handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::NONE)
            .await
            .unwrap();
        assert_eq!(app.mode, Mode::Form);

        for c in "Ana".chars() {
            handle_key_event(&mut app, KeyCode::Char(c), KeyModifiers::NONE)
                .await
                .unwrap();
        }
        assert_eq!(app.coaches.draft(FormTarget::Create).str("name"), Some("Ana"));

        handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE)
            .await
            .unwrap();
        assert_eq!(app.mode, Mode::Normal);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_any_mode() {
        let mut app = app();
        app.enter_help_mode();
        let quit = handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL)
            .await
            .unwrap();
        assert!(quit);
    }

    #[tokio::test]
    async fn test_delete_needs_a_selection() {
        let mut app = app();
        handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::NONE)
            .await
            .unwrap();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.coaches.pending_delete(), None);
    }
}
