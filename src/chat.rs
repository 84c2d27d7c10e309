// Front ends for the chat widget: the interactive terminal session and the
// one-shot `say` turn.

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::app_state::AppState;
use crate::backend::{ChatBackend, HttpBackend, TransportError};
use crate::events::{handle_key_event, Action};
use crate::protocol::ChatReply;
use crate::transcript::{Entry, EntryBody, Role};
use crate::ui::draw_ui;
use crate::widget::{ChatWidget, PendingTurn, Rejected, TurnOrigin};

type TurnResult = (PendingTurn, Result<ChatReply, TransportError>);

/// Sends the turn on its own task; the outcome comes back on `tx`.
fn dispatch(backend: &HttpBackend, turn: PendingTurn, tx: mpsc::Sender<TurnResult>) {
    let backend = backend.clone();
    tokio::spawn(async move {
        let outcome = match turn.origin {
            TurnOrigin::Typed => backend.process_chat(&turn.user_input).await,
            TurnOrigin::Option => backend.process_option(&turn.user_input).await,
        };
        if tx.send((turn, outcome)).await.is_err() {
            warn!("Chat session closed before the reply arrived");
        }
    });
}

/// Runs the interactive chat until the user quits.
pub async fn run_chat_tui(backend: HttpBackend) -> Result<()> {
    if let Err(e) = backend.start_conversation().await {
        // Not fatal: the first turn will show whether the server is reachable
        warn!(error = %e, "Could not reset the conversation");
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &backend).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    backend: &HttpBackend,
) -> Result<()> {
    let mut app = AppState::new(backend.base_url());
    let (reply_tx, mut reply_rx) = mpsc::channel::<TurnResult>(16);
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| draw_ui(f, &mut app))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => match handle_key_event(&mut app, key) {
                        Action::Quit => break,
                        Action::Dispatch(turn) => {
                            info!(origin = ?turn.origin, "Sending turn");
                            dispatch(backend, turn, reply_tx.clone());
                        }
                        Action::None => {}
                    },
                    Some(Ok(_)) => {} // Resize and friends only need a redraw
                    Some(Err(e)) => {
                        error!(error = %e, "Terminal event error");
                        return Err(e.into());
                    }
                    None => break,
                }
            }
            Some((turn, outcome)) = reply_rx.recv() => {
                app.widget.complete(turn, outcome);
                app.sync_textarea_from_widget();
            }
        }
    }

    info!("Chat session finished");
    Ok(())
}

/// Plain-text rendering of one entry, used by `naavi say`.
pub fn format_entry(entry: &Entry) -> String {
    let label = match entry.role {
        Role::User => "You",
        Role::Robot => "Naavi",
    };
    match &entry.body {
        EntryBody::Text(text) => format!("{}: {}", label, text),
        EntryBody::Options(options) => {
            let mut out = format!("{}:", label);
            for (i, option) in options.iter().enumerate() {
                out.push_str(&format!("\n  [{}] {}", i + 1, option));
            }
            out
        }
    }
}

/// Runs a single typed turn and returns the entries it produced.
pub async fn run_single_turn<B: ChatBackend>(backend: &B, text: &str) -> Result<Vec<Entry>> {
    let mut widget = ChatWidget::new();
    widget.set_input(text);
    match widget.send_user_input(backend).await {
        Ok(()) => Ok(widget.entries().to_vec()),
        Err(Rejected::EmptyInput) => Ok(Vec::new()),
        Err(other) => anyhow::bail!("turn was not sent: {:?}", other),
    }
}
