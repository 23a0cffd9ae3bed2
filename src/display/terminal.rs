use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use std::io::stdout;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::input;
use super::viewport::{CanvasView, Viewport};
use crate::config::Config;
use crate::geometry::Detection;
use crate::pointer::{self, PointerReader, PointerSample};
use crate::radar::{Radar, CANVAS_SIZE};
use crate::renderer::Canvas;
use crate::shutdown::{self, ShutdownListener};

/// Runs `restore` when dropped, so the terminal is put back after a normal
/// exit, an error, or a failure halfway through setup.
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(
        stdout(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
        Show
    );
}

/// Release builds abort on panic, so unwinding never reaches the guard.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

pub async fn run(config: Config) -> Result<()> {
    install_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let _guard = TerminalGuard {
        restore: restore_terminal,
    };
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    run_app(&mut terminal, config).await
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, config: Config) -> Result<()> {
    let (pointer_tx, pointer_rx) = pointer::mailbox();
    let (shutdown, stop) = shutdown::channel();
    let (viewport_tx, viewport_rx) = watch::channel(fit_terminal(terminal)?);

    let input = input::spawn(pointer_tx, viewport_rx, shutdown.clone(), stop.clone())
        .context("Failed to start input thread")?;

    let mut radar = Radar::new(CANVAS_SIZE, CANVAS_SIZE, config.detection);

    info!(
        fps = config.display.fps,
        projection = ?config.detection.projection,
        bearing = ?config.detection.bearing,
        "Radar running"
    );

    let result = frame_loop(terminal, &config, &mut radar, &pointer_rx, stop, &viewport_tx).await;

    shutdown.trigger();
    if input.join().is_err() {
        warn!("Input thread panicked");
    }
    info!(frames = radar.frames(), "Radar stopped");

    result
}

/// Draw one frame per tick until `stop` fires.
async fn frame_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    radar: &mut Radar,
    pointer: &PointerReader,
    mut stop: ShutdownListener,
    viewport_tx: &watch::Sender<Viewport>,
) -> Result<()> {
    let mut canvas = Canvas::new(CANVAS_SIZE, CANVAS_SIZE);
    let mut ticker = interval(config.frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = stop.triggered() => return Ok(()),
            _ = ticker.tick() => {}
        }

        let viewport = fit_terminal(terminal)?;
        viewport_tx.send_if_modified(|current| {
            if *current == viewport {
                return false;
            }
            debug!(area = ?viewport.area, "Viewport changed");
            *current = viewport;
            true
        });

        draw_frame(
            terminal,
            &mut canvas,
            radar,
            pointer.latest(),
            viewport,
            config.display.show_status,
        )?;
    }
}

/// Render the current state with `sample`, present it, then advance the sweep.
fn draw_frame<B: Backend>(
    terminal: &mut Terminal<B>,
    canvas: &mut Canvas,
    radar: &mut Radar,
    sample: PointerSample,
    viewport: Viewport,
    show_status: bool,
) -> Result<Option<Detection>> {
    canvas.clear();
    let detection = radar.render(canvas, sample);

    {
        let radar: &Radar = radar;
        let canvas: &Canvas = canvas;
        terminal
            .draw(|frame| {
                let area = frame.area();
                frame.render_widget(CanvasView::new(canvas, viewport), area);
                if show_status {
                    render_status(frame.buffer_mut(), area, radar, detection.as_ref());
                }
            })
            .context("Failed to draw frame")?;
    }

    radar.advance();
    Ok(detection)
}

fn fit_terminal<B: Backend>(terminal: &Terminal<B>) -> Result<Viewport> {
    let size = terminal.size()?;
    Ok(Viewport::fit(
        Rect::new(0, 0, size.width, size.height),
        CANVAS_SIZE,
        CANVAS_SIZE,
    ))
}

/// Target state shown in the status line.
fn target_label(detection: Option<&Detection>) -> &'static str {
    match detection {
        None => "idle",
        Some(d) if d.bright => "DETECT",
        Some(_) => "tracking",
    }
}

fn status_text(radar: &Radar, detection: Option<&Detection>) -> String {
    format!(
        " sweep {:>3}° | trail {:>2}/{} | target: {} | [q]uit ",
        radar.state().bearing_degrees(),
        radar.trail().len(),
        radar.trail().capacity(),
        target_label(detection),
    )
}

fn render_status(buf: &mut Buffer, area: Rect, radar: &Radar, detection: Option<&Detection>) {
    if area.height == 0 {
        return;
    }

    let style = match detection {
        Some(d) if d.bright => Style::default().fg(Color::LightGreen),
        _ => Style::default().fg(Color::DarkGray),
    };
    buf.set_stringn(
        area.x,
        area.y,
        status_text(radar, detection),
        area.width as usize,
        style,
    );
}
