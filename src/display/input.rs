//! Terminal input thread: mouse motion feeds the pointer mailbox, quit keys
//! trigger shutdown.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use super::viewport::Viewport;
use crate::pointer::PointerWriter;
use crate::shutdown::{Shutdown, ShutdownListener};

/// How long a poll blocks before re-checking for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn spawn(
    pointer: PointerWriter,
    viewport: watch::Receiver<Viewport>,
    shutdown: Shutdown,
    listener: ShutdownListener,
) -> Result<JoinHandle<()>> {
    let handle = std::thread::Builder::new()
        .name("radarsweep-input".into())
        .spawn(move || {
            while !listener.is_triggered() {
                if let Err(e) = poll_once(&pointer, &viewport, &shutdown) {
                    warn!("Input error: {}", e);
                    shutdown.trigger();
                    break;
                }
            }
            debug!("Input thread finished");
        })?;
    Ok(handle)
}

fn poll_once(
    pointer: &PointerWriter,
    viewport: &watch::Receiver<Viewport>,
    shutdown: &Shutdown,
) -> Result<()> {
    if event::poll(POLL_INTERVAL)? {
        let event = event::read()?;
        let viewport = *viewport.borrow();
        handle_event(&event, pointer, &viewport, shutdown);
    }
    Ok(())
}

/// Apply one terminal event. The viewport stands in for the capture surface:
/// motion inside it is a pointer sample, motion outside it is a leave.
pub fn handle_event(event: &Event, pointer: &PointerWriter, viewport: &Viewport, shutdown: &Shutdown) {
    match event {
        Event::Key(key) if is_quit(key) => {
            debug!("Quit requested");
            shutdown.trigger();
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                match viewport.cell_to_canvas(mouse.column, mouse.row) {
                    Some(position) => {
                        trace!(x = position.x, y = position.y, "pointer moved");
                        pointer.moved(position);
                    }
                    None => pointer.left(),
                }
            }
            _ => {}
        },
        Event::FocusLost | Event::Resize(..) => pointer.left(),
        _ => {}
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        } | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
    )
}
