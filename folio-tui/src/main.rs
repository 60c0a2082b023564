use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use folio_core::connectivity::ConnectivityWatcher;
use folio_core::{FolioConfig, KvStore};
use folio_tui::{event, ui, App, AppEvent, HandleResult};

/// How often the background probe re-checks the network while offline.
const PROBE_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not corrupt the alternate screen;
    // redirect with `RUST_LOG=debug folio 2>folio.log` when debugging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .compact()
        .init();

    let config = FolioConfig::load()?;
    let store = Arc::new(KvStore::open_default()?);
    let (mut app, watcher) = App::new(&config, store)?;

    spawn_connectivity_tasks(&app, watcher, config.endpoints.contact_url.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Forward offline→online edges into the event channel, and probe the
/// contact endpoint while offline so queued submissions replay without
/// the user resubmitting.
fn spawn_connectivity_tasks(app: &App, mut watcher: ConnectivityWatcher, probe_url: String) {
    let tx = app.events_tx();
    tokio::spawn(async move {
        while watcher.restored().await.is_ok() {
            if tx.send(AppEvent::ConnectivityRestored).is_err() {
                break;
            }
        }
    });

    let connectivity = Arc::clone(&app.services.connectivity);
    tokio::spawn(async move {
        let http = match reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
        {
            Ok(http) => http,
            Err(err) => {
                warn!(error = %err, "connectivity probe disabled");
                return;
            }
        };
        loop {
            tokio::time::sleep(PROBE_INTERVAL).await;
            if connectivity.is_online() {
                continue;
            }
            if folio_client::endpoint_reachable(&http, &probe_url).await {
                connectivity.set_online(true);
            }
        }
    });
}

fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        while let Some(done) = app.try_recv_event() {
            app.apply_event(done);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if let Some(input) = event::poll_event(Duration::from_millis(100))? {
            match input {
                Event::Key(key) => {
                    if event::handle_key(app, key) == HandleResult::Quit {
                        app.should_quit = true;
                    }
                }
                Event::Mouse(mouse) => event::handle_mouse(app, mouse),
                Event::Resize(_, _) => {
                    // Re-rendered on the next loop iteration.
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
