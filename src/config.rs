//! Environment-driven configuration
//!
//! Values are read from the process environment (after `.env` is loaded by
//! `main`). Anything missing or unparsable falls back to its default.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::types::Position;

/// Tuning for the room task
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Interval between broadcast ticks
    pub tick: Duration,
    /// Distance moved per tick per held direction
    pub step: f64,
    /// Where new participants appear
    pub spawn: Position,
    /// Chat text beyond this many characters is cut off
    pub max_message_chars: usize,
    pub broadcast_capacity: usize,
    pub command_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(40), // 25 Hz
            step: 10.0,
            spawn: Position { x: 250.0, y: 250.0 },
            max_message_chars: 280,
            broadcast_capacity: 64,
            command_capacity: 256,
        }
    }
}

impl RoomConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tick_ms = parse_or(
            &lookup,
            "PLAZA_TICK_MS",
            defaults.tick.as_millis() as u64,
        );
        let tick = if tick_ms == 0 {
            tracing::warn!("PLAZA_TICK_MS must be positive, using default");
            defaults.tick
        } else {
            Duration::from_millis(tick_ms)
        };

        // Must be finite and positive or directions stop matching their sign
        let step = parse_or(&lookup, "PLAZA_STEP", defaults.step);
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            tracing::warn!("PLAZA_STEP must be finite and positive, using default");
            defaults.step
        };

        let config = Self {
            tick,
            step,
            spawn: Position {
                x: finite_or(&lookup, "PLAZA_SPAWN_X", defaults.spawn.x),
                y: finite_or(&lookup, "PLAZA_SPAWN_Y", defaults.spawn.y),
            },
            max_message_chars: parse_or(
                &lookup,
                "PLAZA_MAX_MESSAGE_CHARS",
                defaults.max_message_chars,
            )
            .max(1),
            broadcast_capacity: parse_or(
                &lookup,
                "PLAZA_BROADCAST_CAPACITY",
                defaults.broadcast_capacity,
            )
            .max(1),
            command_capacity: parse_or(
                &lookup,
                "PLAZA_COMMAND_CAPACITY",
                defaults.command_capacity,
            )
            .max(1),
        };

        tracing::info!(
            tick_ms = config.tick.as_millis() as u64,
            step = config.step,
            spawn_x = config.spawn.x,
            spawn_y = config.spawn.y,
            "Room config loaded"
        );

        config
    }
}

/// Listener settings for the server binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bind_addr: parse_or(&lookup, "PLAZA_BIND_ADDR", Self::default().bind_addr),
        }
    }
}

fn finite_or<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default);
    if value.is_finite() {
        value
    } else {
        tracing::warn!("{} must be finite, using default", key);
        default
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring invalid {}={:?}: {}", key, raw, e);
                default
            }
        },
        None => default,
    }
}
