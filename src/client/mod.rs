//! Client-side rendering and input.
//!
//! Everything here except [`terminal`] is pure state so it can be tested
//! without a terminal or a socket.

pub mod keymap;
pub mod scene;
pub mod terminal;
pub mod view;

pub use keymap::{HeldKeys, KeyMap};
pub use scene::{Primitive, Scene};
pub use view::ClientView;

/// Errors that end a client session
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket failed: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("could not encode message: {0}")]
    Json(#[from] serde_json::Error),
}

/// Last few characters of a connection id, for labels
pub fn short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(3)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &id[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("01HZX3ABCDEF"), "CDEF");
        assert_eq!(short_id("ab"), "ab");
        assert_eq!(short_id(""), "");
    }
}
