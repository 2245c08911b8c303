//! Session driver - one resolver behind the line protocol
//!
//! The session is synchronous: each request line is handled to completion
//! and produces exactly one reply line.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{ResolveError, Resolver, ResolverConfig};
use crate::protocol::{
    create_ack, create_board, create_error, create_resolution, parse_message, salvage_seq,
    AckMessage, BoardMessage, ErrorCode, ErrorMessage, InitMessage, ParsedMessage,
    ResolutionMessage, TapMessage,
};
use crate::replay_log::ReplayLog;
use crate::types::GridPos;

/// Session configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub resolver: ResolverConfig,
    /// JSONL replay log destination; `None` disables logging
    pub log_path: Option<String>,
}

impl SessionConfig {
    /// Create from environment variables
    ///
    /// Adds `MATCH3_LOG_PATH` to the resolver's variables. A blank value
    /// disables the log.
    pub fn from_env() -> Self {
        let log_path = std::env::var("MATCH3_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            resolver: ResolverConfig::from_env(),
            log_path,
        }
    }
}

/// Reply to one request
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    Board(BoardMessage),
    Resolution(ResolutionMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
}

impl OutboundMessage {
    pub fn seq(&self) -> u64 {
        match self {
            OutboundMessage::Board(m) => m.seq,
            OutboundMessage::Resolution(m) => m.seq,
            OutboundMessage::Ack(m) => m.seq,
            OutboundMessage::Error(m) => m.seq,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        fn encode<T: Serialize>(msg: &T) -> Result<String> {
            serde_json::to_string(msg).context("failed to encode reply")
        }
        match self {
            OutboundMessage::Board(m) => encode(m),
            OutboundMessage::Resolution(m) => encode(m),
            OutboundMessage::Ack(m) => encode(m),
            OutboundMessage::Error(m) => encode(m),
        }
    }

    fn record(&self, log: &mut ReplayLog) {
        match self {
            OutboundMessage::Board(m) => log.record(m),
            OutboundMessage::Resolution(m) => log.record(m),
            OutboundMessage::Ack(m) => log.record(m),
            OutboundMessage::Error(m) => log.record(m),
        }
    }
}

pub struct Session {
    resolver: Resolver,
    log: Option<ReplayLog>,
}

impl Session {
    /// Build the resolver and open the replay log.
    ///
    /// A log that cannot be opened is reported on stderr and skipped; a bad
    /// resolver configuration is fatal.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let resolver = Resolver::new(config.resolver).with_context(|| {
            format!(
                "failed to build board (colors={}, seed={})",
                config.resolver.color_count, config.resolver.seed
            )
        })?;

        let log = config.log_path.as_deref().and_then(|path| match ReplayLog::open(path) {
            Ok(log) => Some(log),
            Err(e) => {
                eprintln!("[match3] cannot open replay log {}: {}", path, e);
                None
            }
        });

        Ok(Self { resolver, log })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Handle one request line and return the encoded reply
    pub fn handle_line(&mut self, line: &str) -> Result<String> {
        if let Some(log) = self.log.as_mut() {
            log.record_inbound(line);
        }

        let reply = match parse_message(line) {
            Ok(msg) => self.handle(msg),
            Err(e) => {
                eprintln!("[match3] malformed request: {}", e);
                OutboundMessage::Error(create_error(
                    salvage_seq(line),
                    ErrorCode::BadRequest,
                    &e.to_string(),
                ))
            }
        };

        if let Some(log) = self.log.as_mut() {
            reply.record(log);
        }
        reply.to_json()
    }

    /// Handle one parsed request
    pub fn handle(&mut self, msg: ParsedMessage) -> OutboundMessage {
        match msg {
            ParsedMessage::Init(m) => self.handle_init(m),
            ParsedMessage::Tap(m) => self.handle_tap(m),
            ParsedMessage::Clear(m) => {
                let cleared = self.resolver.clear_command_logs();
                OutboundMessage::Ack(create_ack(m.seq, cleared))
            }
            ParsedMessage::Snapshot(m) => {
                OutboundMessage::Board(create_board(m.seq, &self.resolver.snapshot()))
            }
            ParsedMessage::Unknown(m) => OutboundMessage::Error(create_error(
                m.seq,
                ErrorCode::BadRequest,
                &format!("unknown message type '{}'", m.msg_type),
            )),
        }
    }

    fn handle_init(&mut self, m: InitMessage) -> OutboundMessage {
        let colors = match u8::try_from(m.colors) {
            Ok(colors) => colors,
            Err(_) => {
                let e = ResolveError::color_count(m.colors);
                return OutboundMessage::Error(create_error(m.seq, (&e).into(), &e.to_string()));
            }
        };

        let result = match m.seed {
            Some(seed) => {
                let config = self
                    .resolver
                    .config()
                    .with_color_count(colors)
                    .with_seed(seed);
                Resolver::new(config).map(|resolver| {
                    self.resolver = resolver;
                    self.resolver.snapshot()
                })
            }
            None => self.resolver.init_board(colors),
        };

        match result {
            Ok(snap) => OutboundMessage::Board(create_board(m.seq, &snap)),
            Err(e) => OutboundMessage::Error(create_error(m.seq, (&e).into(), &e.to_string())),
        }
    }

    fn handle_tap(&mut self, m: TapMessage) -> OutboundMessage {
        let pos = match (i8::try_from(m.x), i8::try_from(m.y)) {
            (Ok(x), Ok(y)) => GridPos::new(x, y),
            _ => {
                return OutboundMessage::Error(create_error(
                    m.seq,
                    ErrorCode::InvalidPosition,
                    &format!("position ({}, {}) is out of range", m.x, m.y),
                ))
            }
        };

        match self.resolver.select_cell(pos) {
            Ok(res) => OutboundMessage::Resolution(create_resolution(m.seq, &res)),
            Err(e) => OutboundMessage::Error(create_error(m.seq, (&e).into(), &e.to_string())),
        }
    }
}
