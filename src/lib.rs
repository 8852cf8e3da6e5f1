// Public API for integration tests and the terminal client

pub mod api;
pub mod client;
pub mod config;
pub mod protocol;
pub mod room;
pub mod server;
pub mod state;
pub mod types;
pub mod ws;

// Re-export broadcast for testing
pub mod broadcast;
