mod app;
mod input;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

pub use app::ChatApp;

use crate::error::CbxError;

pub async fn run(mut app: ChatApp) -> Result<(), CbxError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChatApp,
) -> Result<(), CbxError> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll with a timeout so replies from the blocking pool get picked up
        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            input::handle_event(app, event);
        }

        app.poll_response();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
