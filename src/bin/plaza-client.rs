//! Terminal client for a plaza room.
//!
//! Usage: `plaza-client [ws://host:port/ws]` (or set `PLAZA_URL`).
//! `PLAZA_HOLD_MS` sets how long a key counts as held without a repeat.

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        Event, EventStream, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use plaza::client::terminal::{handle_key, KeyOutcome, Scale, TerminalCanvas};
use plaza::client::keymap::hold_from_lookup;
use plaza::client::view::DEFAULT_LOG_CAPACITY;
use plaza::client::{ClientError, ClientView, HeldKeys, KeyMap};
use plaza::protocol::{ClientMessage, ServerMessage};

const DEFAULT_URL: &str = "ws://127.0.0.1:4000/ws";

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Logs would scribble over the canvas, so only log when asked to (to stderr)
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PLAZA_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    tracing::info!("Connecting to {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;

    let enhanced = setup_terminal()?;
    let result = run(ws_stream).await;
    restore_terminal(enhanced)?;

    result
}

/// Raw mode + alternate screen. Returns whether key release reporting was enabled.
fn setup_terminal() -> Result<bool, ClientError> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide)?;

    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Ok(enhanced)
}

fn restore_terminal(enhanced: bool) -> Result<(), ClientError> {
    let mut out = stdout();
    if enhanced {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(out, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

async fn run<S>(ws_stream: S) -> Result<(), ClientError>
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut events = EventStream::new();
    let hold = hold_from_lookup(|key| std::env::var(key).ok());
    let mut view = ClientView::new(KeyMap::default(), HeldKeys::new(hold), DEFAULT_LOG_CAPACITY);
    let mut canvas: TerminalCanvas<Stdout> = TerminalCanvas::new(stdout(), Scale::default());
    let mut expiry = tokio::time::interval(Duration::from_millis(50));

    send(&mut ws_sender, &ClientMessage::JoinChat).await?;
    redraw(&mut canvas, &view)?;

    loop {
        tokio::select! {
            event = events.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => match handle_key(&mut view, key, Instant::now()) {
                        KeyOutcome::Send(messages) => {
                            for msg in &messages {
                                send(&mut ws_sender, msg).await?;
                            }
                            redraw(&mut canvas, &view)?;
                        }
                        KeyOutcome::Redraw => redraw(&mut canvas, &view)?,
                        KeyOutcome::Ignore => {}
                        KeyOutcome::Quit => break,
                    },
                    Some(Ok(Event::Resize(..))) => redraw(&mut canvas, &view)?,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }

            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(text.as_str()) {
                            Ok(msg) => {
                                view.apply(msg);
                                redraw(&mut canvas, &view)?;
                            }
                            Err(e) => tracing::debug!("Ignoring unknown frame: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }

            _ = expiry.tick() => {
                for msg in view.expire_held(Instant::now()) {
                    send(&mut ws_sender, &msg).await?;
                }
            }
        }
    }

    let _ = ws_sender.send(Message::Close(None)).await;
    Ok(())
}

async fn send<S>(sink: &mut S, msg: &ClientMessage) -> Result<(), ClientError>
where
    S: futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(msg)?;
    sink.send(Message::Text(json.into())).await?;
    Ok(())
}

fn redraw(canvas: &mut TerminalCanvas<Stdout>, view: &ClientView) -> Result<(), ClientError> {
    let (cols, rows) = terminal::size()?;
    canvas.draw(view, cols, rows)?;
    Ok(())
}
