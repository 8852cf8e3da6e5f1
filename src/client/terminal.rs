//! Terminal front end: crossterm drawing and key translation.

use std::io::{self, Write};
use std::time::Instant;

use crossterm::{
    cursor,
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use super::scene::{Primitive, Scene};
use super::short_id;
use super::view::ClientView;
use crate::protocol::ClientMessage;

/// Chat lines shown under the canvas
const LOG_ROWS: u16 = 6;

/// World units per terminal cell. Cells are about twice as tall as wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 10.0, y: 20.0 }
    }
}

/// Map a world position into a `width` x `height` cell grid.
/// Positions outside the grid are not drawn.
pub fn world_to_cell(x: f64, y: f64, scale: Scale, width: u16, height: u16) -> Option<(u16, u16)> {
    let col = (x / scale.x).floor();
    let row = (y / scale.y).floor();
    if col < 0.0 || row < 0.0 || col >= f64::from(width) || row >= f64::from(height) {
        return None;
    }
    Some((col as u16, row as u16))
}

/// DOM-style key name for a terminal key code
pub fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

/// What the event loop should do after a key event
#[derive(Debug, PartialEq)]
pub enum KeyOutcome {
    /// Send these messages and redraw (the list may be empty)
    Send(Vec<ClientMessage>),
    Redraw,
    Ignore,
    Quit,
}

pub fn handle_key(view: &mut ClientView, key: KeyEvent, now: Instant) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    if key.kind == KeyEventKind::Release {
        return match key_name(key.code).and_then(|name| view.key_up(&name)) {
            Some(msg) => KeyOutcome::Send(vec![msg]),
            None => KeyOutcome::Ignore,
        };
    }

    if view.is_composing() {
        match key.code {
            KeyCode::Enter => KeyOutcome::Send(view.submit().into_iter().collect()),
            KeyCode::Esc => {
                view.cancel_composing();
                KeyOutcome::Redraw
            }
            KeyCode::Backspace => {
                view.backspace();
                KeyOutcome::Redraw
            }
            KeyCode::Char(c) => {
                view.push_char(c);
                KeyOutcome::Redraw
            }
            _ => KeyOutcome::Ignore,
        }
    } else {
        match key.code {
            KeyCode::Enter => KeyOutcome::Send(view.start_composing()),
            KeyCode::Char('q') | KeyCode::Esc => KeyOutcome::Quit,
            code => match key_name(code).and_then(|name| view.key_down(&name, now)) {
                Some(msg) => KeyOutcome::Send(vec![msg]),
                None => KeyOutcome::Ignore,
            },
        }
    }
}

fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Draws a [`ClientView`] onto any writer that accepts crossterm commands
pub struct TerminalCanvas<W: Write> {
    out: W,
    scale: Scale,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, scale: Scale) -> Self {
        Self { out, scale }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Redraw the whole screen for a terminal of `cols` x `rows`
    pub fn draw(&mut self, view: &ClientView, cols: u16, rows: u16) -> io::Result<()> {
        let log_rows = LOG_ROWS.min(rows.saturating_sub(3));
        let canvas_rows = rows.saturating_sub(log_rows + 2);

        self.out.queue(Clear(ClearType::All))?;

        for primitive in &Scene::build(view).primitives {
            match primitive {
                Primitive::Avatar { x, y, is_self, .. } => {
                    if let Some((col, row)) = world_to_cell(*x, *y, self.scale, cols, canvas_rows) {
                        let (glyph, color) = if *is_self {
                            ('@', Color::Yellow)
                        } else {
                            ('o', Color::Cyan)
                        };
                        self.out
                            .queue(cursor::MoveTo(col, row))?
                            .queue(SetForegroundColor(color))?
                            .queue(Print(glyph))?
                            .queue(ResetColor)?;
                    }
                }
                Primitive::Bubble { x, y, text, .. } => {
                    if let Some((col, row)) = world_to_cell(*x, *y, self.scale, cols, canvas_rows) {
                        let bubble = format!("({})", text);
                        let half = (bubble.chars().count() / 2) as u16;
                        let start = col.saturating_sub(half);
                        let bubble = fit(&bubble, usize::from(cols - start));
                        self.out
                            .queue(cursor::MoveTo(start, row))?
                            .queue(Print(bubble))?;
                    }
                }
            }
        }

        self.out
            .queue(cursor::MoveTo(0, canvas_rows))?
            .queue(Print("-".repeat(usize::from(cols))))?;

        let lines: Vec<_> = view.log().collect();
        let skip = lines.len().saturating_sub(usize::from(log_rows));
        for (i, line) in lines.iter().skip(skip).enumerate() {
            let sender = if view.is_self(&line.sender_id) {
                "you"
            } else {
                short_id(&line.sender_id)
            };
            let text = fit(&format!("[{}] {}", sender, line.text), usize::from(cols));
            self.out
                .queue(cursor::MoveTo(0, canvas_rows + 1 + i as u16))?
                .queue(Print(text))?;
        }

        let prompt = if view.is_composing() {
            format!("> {}_", view.compose_text())
        } else {
            let help = "Enter: chat  arrows/wasd: move  q: quit";
            match view.me() {
                Some(me) => format!("({:.0}, {:.0})  {}", me.x, me.y, help),
                None => help.to_string(),
            }
        };
        self.out
            .queue(cursor::MoveTo(0, rows.saturating_sub(1)))?
            .queue(Print(fit(&prompt, usize::from(cols))))?;

        self.out.flush()
    }
}
