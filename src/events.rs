use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::App;

/// File written by the `e` key.
pub const EXPORT_PATH: &str = "attackwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // While editing the input, keys are text
    if app.editing_input {
        handle_input_key(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Row click
        KeyCode::Enter => app.click_selected_row(),

        // Edit the ip_address input
        KeyCode::Char('i') => app.start_input(),

        // Poll now / reload the whole page
        KeyCode::Char('r') => app.refresh_now(),
        KeyCode::Char('R') => app.reload_page(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while the `ip_address` input is being edited
fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.finish_input(),

        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_clear();
        }

        KeyCode::Backspace => app.input_pop(),

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click a table row
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = table_row_at(app, mouse.column, mouse.row) {
                app.click_row(index);
            }
        }

        _ => {}
    }
}

/// Map a screen position to an IP table row index.
///
/// The first row inside the border is the column header.
fn table_row_at(app: &App, column: u16, row: u16) -> Option<usize> {
    let area = app.table_area;
    let first_row = area.y + 2;
    let last_row = (area.y + area.height).saturating_sub(1);

    if column <= area.x || column + 1 >= area.x + area.width {
        return None;
    }
    if row < first_row || row >= last_row {
        return None;
    }

    Some((row - first_row) as usize + app.table_state.offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PollFailure;
    use crate::page::Page;
    use crate::poller::DashboardPoller;
    use crate::source::{MetricsSnapshot, SnapshotSource};
    use crate::ui::Theme;
    use async_trait::async_trait;
    use crossterm::event::KeyEventKind;
    use ratatui::layout::Rect;
    use std::sync::Arc;
    use tokio::runtime::Runtime;

    #[derive(Debug)]
    struct StaticSource;

    #[async_trait]
    impl SnapshotSource for StaticSource {
        async fn fetch(&self) -> Result<MetricsSnapshot, PollFailure> {
            Ok(serde_json::from_str(
                r#"{
                    "attack_stats": {"SQL Injection": 3},
                    "attack_chart": "",
                    "malicious_ips": [
                        {"ip": "192.168.1.10", "threat_level": "high"},
                        {"ip": "192.168.1.11", "threat_level": "low"},
                        {"ip": "192.168.1.12", "threat_level": "medium"}
                    ]
                }"#,
            )?)
        }

        fn description(&self) -> &str {
            "static"
        }
    }

    fn test_app(rt: &Runtime) -> App {
        let source: Arc<dyn SnapshotSource> = Arc::new(StaticSource);
        let page = Page::dashboard().into_shared();
        let poller = DashboardPoller::new(source.clone(), page.clone());
        let mut app = App::new(source, page, poller, rt.handle().clone(), Theme::dark());
        app.reload_page();
        app.wait_for_reload();
        app.status_message = None;
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_quit() {
        let rt = Runtime::new().unwrap();
        let mut app = test_app(&rt);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let rt = Runtime::new().unwrap();
        let mut app = test_app(&rt);

        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_enter_copies_selected_ip() {
        let rt = Runtime::new().unwrap();
        let mut app = test_app(&rt);

        handle_key_event(&mut app, key(KeyCode::Down));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.page().ip_input_value(), Some("192.168.1.11"));
    }

    #[test]
    fn test_input_mode_captures_keys() {
        let rt = Runtime::new().unwrap();
        let mut app = test_app(&rt);

        handle_key_event(&mut app, key(KeyCode::Char('i')));
        assert!(app.editing_input);

        // 'q' is text while editing
        for c in "10.0.0.1q".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        assert!(app.running);
        handle_key_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.page().ip_input_value(), Some("10.0.0.1"));

        let ctrl_u = KeyEvent {
            code: KeyCode::Char('u'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        handle_key_event(&mut app, ctrl_u);
        assert_eq!(app.page().ip_input_value(), Some(""));

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.editing_input);
    }

    #[test]
    fn test_click_table_row() {
        let rt = Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.table_area = Rect::new(20, 5, 50, 10);

        // Border at y=5, column header at y=6, first row at y=7
        handle_mouse_event(&mut app, click(30, 9));
        assert_eq!(app.selected_row, 2);
        assert_eq!(app.page().ip_input_value(), Some("192.168.1.12"));
    }

    #[test]
    fn test_click_outside_table_is_ignored() {
        let rt = Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.table_area = Rect::new(20, 5, 50, 10);

        handle_mouse_event(&mut app, click(30, 6));
        handle_mouse_event(&mut app, click(5, 8));
        handle_mouse_event(&mut app, click(30, 14));
        assert_eq!(app.page().ip_input_value(), Some(""));
    }

    #[test]
    fn test_click_below_last_row_is_ignored() {
        let rt = Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.table_area = Rect::new(0, 0, 50, 10);

        handle_mouse_event(&mut app, click(10, 7));
        assert_eq!(app.selected_row, 0);
        assert_eq!(app.page().ip_input_value(), Some(""));
    }
}
