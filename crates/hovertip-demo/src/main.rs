#![forbid(unsafe_code)]

//! hovertip demo binary entry point.

mod app;
mod cli;
mod logging;

use std::io;
use std::time::{Duration, Instant};

use hovertip_core::geometry::Size;
use hovertip_core::terminal_session::{SessionOptions, TerminalSession};
use hovertip_render::buffer::Buffer;
use hovertip_render::presenter::Presenter;

use app::App;

/// Poll interval while a fade is running (~60 fps).
const FRAME: Duration = Duration::from_millis(16);
/// Poll interval when nothing is animating.
const IDLE: Duration = Duration::from_millis(250);

fn main() -> io::Result<()> {
    let opts = cli::Opts::parse();
    if let Err(err) = logging::init(&opts.log_filter, opts.log_file.as_deref()) {
        eprintln!("Cannot open log file: {err}");
    }

    let mut entries = app::builtin_entries();
    if let Some(path) = &opts.bindings {
        entries.extend(app::load_entries(path));
    }

    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        mouse_capture: opts.mouse,
    })?;
    let (width, height) = session.size()?;
    tracing::info!(width, height, buttons = entries.len(), "demo started");

    let mut app = App::new(Size::new(width, height), entries, opts.margin);
    tracing::debug!(tooltips = app.layer().len(), "tooltips mounted");
    let mut presenter = Presenter::new(io::stdout());
    let started = Instant::now();
    let mut last = started;

    while !app.should_quit() {
        let viewport = app.viewport();
        let mut buf = Buffer::new(viewport.width.max(1), viewport.height.max(1));
        app.render(&mut buf);
        presenter.present(&buf)?;

        let timeout = if app.is_animating() { FRAME } else { IDLE };
        if session.poll_event(timeout)?
            && let Some(event) = session.read_event()?
        {
            app.handle_event(&event);
        }

        let now = Instant::now();
        app.tick(now - last);
        last = now;

        if opts.exit_after_ms > 0 && started.elapsed() >= Duration::from_millis(opts.exit_after_ms) {
            app.quit();
        }
    }

    tracing::info!("demo finished");
    Ok(())
}
