use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env, io,
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TICK: Duration = Duration::from_millis(100);

mod app;
mod config;
mod details;
mod error;
mod fs_list;
mod git_ops;
mod list;
mod logging;
mod message;
mod panes;
mod theme;
mod ui;

use app::{App, AppEvent};
use config::Config;
use error::AppError;
use message::{Cmd, Message};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Run each task on the blocking pool and post its message back.
/// Returns true when a quit was requested.
fn spawn_all(cmds: Vec<Cmd>, tx: &mpsc::UnboundedSender<Message>) -> bool {
    let mut quit = false;
    for cmd in cmds {
        match cmd {
            Cmd::Quit => quit = true,
            Cmd::Task(task) => {
                let tx = tx.clone();
                let origin = task.origin;
                tokio::spawn(async move {
                    let msg = match tokio::task::spawn_blocking(move || task.run()).await {
                        Ok(msg) => msg,
                        Err(e) => {
                            warn!(pane = origin, "task aborted: {e}");
                            Message::Failed {
                                pane: origin,
                                error: e.to_string(),
                            }
                        }
                    };
                    // Receiver is gone only during shutdown.
                    let _ = tx.send(msg);
                });
            }
        }
    }
    quit
}

fn setup_terminal() -> Result<Tui, AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<(), AppError> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<(), AppError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut event_stream = EventStream::new();
    let palette = theme::DEFAULT;

    let size = terminal.size()?;
    app.dispatch(AppEvent::Resize(size.width, size.height));
    let mut quit = spawn_all(app.init(), &tx);

    while !quit && !app.is_quitting() {
        app.tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app, &palette))?;

        let poll_timeout = tokio::time::sleep(TICK);
        tokio::pin!(poll_timeout);

        let cmds = tokio::select! {
            Some(msg) = rx.recv() => app.dispatch(AppEvent::Message(msg)),
            Some(event_result) = event_stream.next() => match event_result? {
                Event::Key(key) => app.dispatch(AppEvent::Key(key)),
                Event::Mouse(mouse) => app.dispatch(AppEvent::Mouse(mouse)),
                Event::Resize(w, h) => app.dispatch(AppEvent::Resize(w, h)),
                _ => Vec::new(),
            },
            _ = &mut poll_timeout => Vec::new(),
        };
        quit = spawn_all(cmds, &tx);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    if let Some(arg) = env::args().nth(1)
        && (arg == "--version" || arg == "-V")
    {
        println!("gitdeck {}", VERSION);
        return ExitCode::SUCCESS;
    }

    let repo = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::from_env();
    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("gitdeck: {e}");
    }
    info!(repo = %repo.display(), layout = ?config.layout, "starting gitdeck {VERSION}");

    let mut terminal = match setup_terminal() {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            eprintln!("gitdeck: {e}");
            let _ = disable_raw_mode();
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::from_config(&config, &repo);
    let outcome = run(&mut terminal, &mut app).await;
    let restored = restore_terminal(&mut terminal);

    match outcome.and(restored) {
        Ok(()) => {
            info!("shutdown");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("gitdeck: {e}");
            ExitCode::FAILURE
        }
    }
}
