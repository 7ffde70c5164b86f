use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// File written by the in-app export key.
pub const EXPORT_FILE: &str = "harvester_export.json";

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

    // The error screen only offers retry and quit
    if app.load_error.is_some() {
        match key.code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('r') => app.retry(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Charts),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Charts
        KeyCode::Char('s') => app.cycle_sensor(),
        KeyCode::Char('a') => app.add_chart(),
        KeyCode::Char('x') => {
            if app.current_view == View::Charts {
                app.remove_chart();
            }
        }
        KeyCode::Char('c') => {
            if app.current_view == View::Charts {
                app.toggle_compare();
            }
        }
        KeyCode::Char('t') => app.cycle_chart_style(),

        // Manual pass, whether or not the driver is faulted
        KeyCode::Char('r') => app.retry(),

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
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

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            // Tab bar sits on row 1, just below the header
            if mouse.row == 1 {
                if mouse.column < 13 {
                    app.set_view(View::Overview);
                } else if mouse.column < 24 {
                    app.set_view(View::Charts);
                }
                return;
            }

            // Overview rows start after the table border and header row
            if app.current_view == View::Overview && mouse.row > content_start_row + 1 {
                let item_row = (mouse.row - content_start_row - 2) as usize;
                if let Some(key) = crate::data::SensorKey::ALL.get(item_row) {
                    app.selected_sensor = *key;
                }
            }
        }

        _ => {}
    }
}
