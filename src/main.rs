use std::io;
use std::process::ExitCode;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

mod app;
mod check;
mod cli;
mod error;
mod events;
mod explorer;
mod logging;
mod markdown;
mod nav_stack;
mod provider;
mod schema;
mod theme;
mod ui;

use app::App;
use cli::Cli;
use logging::LogTarget;
use provider::{SchemaProvider, SchemaSource};
use theme::Theme;

const MAX_PROVIDER_EVENTS_PER_LOOP: usize = 16;

fn main() -> io::Result<ExitCode> {
    let cli = Cli::parse();
    let Some(source) = cli.source() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "one of --schema-file or --schema-command is required",
        ));
    };
    logging::init(
        LogTarget::select(cli.log_file.as_deref(), !cli.check),
        cli.verbose,
    )?;

    if cli.check {
        return run_check_mode(&source, &cli.open_segments());
    }

    let theme = Theme::load_or_default(&cli.theme);
    let mut app = App::new(source.describe());
    if let Some(path) = cli.open.as_deref() {
        app = app.with_initial_path(path);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    let result = run_app(&mut terminal, app, SchemaProvider::new(source), &theme);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "ui loop failed");
    }
    result.map(|()| ExitCode::SUCCESS)
}

fn run_check_mode(source: &SchemaSource, open: &[&str]) -> io::Result<ExitCode> {
    let summary = check::run_check(source, open);
    let json = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
    println!("{json}");
    Ok(if summary.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut provider: SchemaProvider,
    theme: &Theme,
) -> io::Result<()> {
    provider.refetch();
    app.apply_snapshot(provider.snapshot().clone());

    while app.running {
        if provider.poll_limited(MAX_PROVIDER_EVENTS_PER_LOOP) {
            app.apply_snapshot(provider.snapshot().clone());
        }

        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);
        app.set_scroll(ui::visible_scroll(screen, &app));
        terminal.draw(|frame| ui::render(frame, &app, theme))?;

        let event = events::next_event()?;
        app.handle_event(event, ui::max_scroll(screen, &app));
        if app.take_refetch_request() {
            provider.refetch();
            app.apply_snapshot(provider.snapshot().clone());
        }
    }

    Ok(())
}
