//! Terminal input for the word picker.

use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use wordwalk_engine::SelectionEvent;

use crate::render::ListLayout;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads crossterm events on a blocking thread and hands them to async code.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        match self.rx.recv().await {
            Some(InputMsg::Event(ev)) => Ok(ev),
            Some(InputMsg::Error(msg)) => Err(anyhow!("input error: {msg}")),
            None => Err(anyhow!("input pump disconnected")),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a blocked send in the input thread returns.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Translates a terminal event into a picker action.
///
/// `layout` is the geometry of the last drawn frame, used to resolve clicks.
#[must_use]
pub fn map_event(ev: &Event, layout: &ListLayout) -> Option<SelectionEvent> {
    match ev {
        Event::Key(key) => map_key(*key),
        Event::Mouse(mouse) => map_mouse(*mouse, layout),
        _ => None,
    }
}

#[must_use]
pub fn map_key(key: KeyEvent) -> Option<SelectionEvent> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(SelectionEvent::Cancel),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => SelectionEvent::Up,
        KeyCode::Down | KeyCode::Char('j') => SelectionEvent::Down,
        KeyCode::PageUp => SelectionEvent::PageUp,
        KeyCode::PageDown => SelectionEvent::PageDown,
        KeyCode::Home => SelectionEvent::First,
        KeyCode::End => SelectionEvent::Last,
        // Toggling and confirming are one-shot; ignore auto-repeat.
        _ if key.kind == KeyEventKind::Repeat => return None,
        KeyCode::Char(' ') => SelectionEvent::ToggleCursor,
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => SelectionEvent::Confirm,
        _ => return None,
    };
    Some(action)
}

fn map_mouse(mouse: MouseEvent, layout: &ListLayout) -> Option<SelectionEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => layout
            .index_at(mouse.column, mouse.row)
            .map(SelectionEvent::Toggle),
        MouseEventKind::ScrollUp => Some(SelectionEvent::Up),
        MouseEventKind::ScrollDown => Some(SelectionEvent::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(map_key(key(KeyCode::Up)), Some(SelectionEvent::Up));
        assert_eq!(map_key(key(KeyCode::Char('j'))), Some(SelectionEvent::Down));
        assert_eq!(map_key(key(KeyCode::PageDown)), Some(SelectionEvent::PageDown));
        assert_eq!(map_key(key(KeyCode::End)), Some(SelectionEvent::Last));
    }

    #[test]
    fn space_toggles_and_enter_confirms() {
        assert_eq!(
            map_key(key(KeyCode::Char(' '))),
            Some(SelectionEvent::ToggleCursor)
        );
        assert_eq!(map_key(key(KeyCode::Enter)), Some(SelectionEvent::Confirm));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(SelectionEvent::Confirm));
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(SelectionEvent::Confirm));
    }

    #[test]
    fn ctrl_c_cancels() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ev), Some(SelectionEvent::Cancel));
        let ev = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ev), None);
    }

    #[test]
    fn release_and_repeat_confirm_are_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Enter,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(release), None);

        let repeat = KeyEvent::new_with_kind_and_state(
            KeyCode::Enter,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(repeat), None);

        let repeat_down = KeyEvent::new_with_kind_and_state(
            KeyCode::Down,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(repeat_down), Some(SelectionEvent::Down));
    }

    #[test]
    fn click_resolves_row_through_layout() {
        let layout = ListLayout {
            area: Rect::new(2, 4, 30, 5),
            offset: 10,
            len: 13,
        };

        assert_eq!(
            map_event(&click(5, 4), &layout),
            Some(SelectionEvent::Toggle(10))
        );
        assert_eq!(
            map_event(&click(5, 6), &layout),
            Some(SelectionEvent::Toggle(12))
        );
        // Past the last item.
        assert_eq!(map_event(&click(5, 7), &layout), None);
        // Outside the list.
        assert_eq!(map_event(&click(40, 4), &layout), None);
        assert_eq!(map_event(&click(5, 1), &layout), None);
    }

    #[test]
    fn scroll_wheel_moves_cursor() {
        let ev = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            map_event(&ev, &ListLayout::default()),
            Some(SelectionEvent::Down)
        );
    }
}
