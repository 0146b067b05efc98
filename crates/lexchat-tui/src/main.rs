use anyhow::{anyhow, Result};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let mut app = App::new()?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(
    terminal: &mut tui::Tui,
    events: &mut tui::EventHandler,
    app: &mut App,
) -> Result<()> {
    loop {
        // Fold a finished exchange into the transcript before drawing
        if app.query_task.as_ref().is_some_and(|task| task.is_finished()) {
            if let Some(task) = app.query_task.take() {
                let outcome = match task.await {
                    Ok(outcome) => outcome,
                    Err(err) => Err(anyhow!("exchange task failed: {}", err)),
                };
                app.finish_exchange(outcome);
            }
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Log to a file under the config directory: stderr carries the
/// alternate screen, so it cannot take log lines.
fn init_logging() {
    let Some(dir) = dirs::config_dir().map(|d| d.join("lexchat")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    if let Ok(file) = std::fs::File::create(dir.join("lexchat.log")) {
        let _ = simplelog::WriteLogger::init(
            log::LevelFilter::Info,
            simplelog::Config::default(),
            file,
        );
    }
}
