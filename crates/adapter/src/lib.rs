//! Adapter module - the presentation boundary
//!
//! A presentation layer (renderer, test harness, replay tool) drives the
//! resolver through a **line-delimited JSON protocol**: one request per line,
//! one reply per line, each reply echoing the request's `seq`.
//!
//! # Message Types
//!
//! ## Client → Resolver
//!
//! - **init**: start a new board with `colors` colors, optionally reseeding
//! - **tap**: select a cell; the second adjacent tap swaps and resolves
//! - **clear**: discard consumed command logs once playback is done
//! - **snapshot**: request the current board
//!
//! ## Resolver → Client
//!
//! - **board**: kind and status grids plus a stable board hash
//! - **resolution**: changed tiles with their command logs, global effects,
//!   cascade cycle count and the total virtual duration
//! - **ack**: reply to `clear`
//! - **error**: error response with code and message
//!
//! # Environment Variables
//!
//! - `MATCH3_COLOR_COUNT`: color pool size (default 5)
//! - `MATCH3_SEED`: RNG seed (default 1)
//! - `MATCH3_LOG_PATH`: JSONL replay log; unset or blank disables it
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Resolver: {"type":"init","seq":1,"colors":5,"seed":42}
//! Resolver -> Client: {"type":"board","seq":1,"width":9,"height":9,"colors":5,"kinds":[...],...}
//! Client -> Resolver: {"type":"tap","seq":2,"x":4,"y":4}
//! Resolver -> Client: {"type":"resolution","seq":2,"changed":[],"effects":[],"cycles":0,"duration_ms":0}
//! Client -> Resolver: {"type":"tap","seq":3,"x":5,"y":4}
//! Resolver -> Client: {"type":"resolution","seq":3,"changed":[{"id":31,"kind":"c",...}],...}
//! Client -> Resolver: {"type":"clear","seq":4}
//! Resolver -> Client: {"type":"ack","seq":4,"cleared":12}
//! ```

pub mod protocol;
pub mod replay_log;
pub mod session;

pub use match3_core as core;
pub use match3_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use replay_log::ReplayLog;
pub use session::{OutboundMessage, Session, SessionConfig};
