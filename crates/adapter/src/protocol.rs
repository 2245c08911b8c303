//! Protocol module - JSON message types for the presentation boundary
//!
//! Line-delimited JSON. Every request carries a `seq` that the reply echoes.

use serde::{Deserialize, Serialize};

use crate::core::{BoardSnapshot, Resolution, ResolveError, TileView};
use crate::types::{
    Command, CommandAction, Effect, EffectAction, SpecialStatus, TileKind, GRID_HEIGHT, GRID_WIDTH,
};

// ============== Client -> Resolver Messages ==============

/// Start a new board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitMessage {
    pub seq: u64,
    /// Wider than the resolver's `u8` so out-of-range counts reach the
    /// range check instead of failing to parse
    pub colors: u32,
    /// Reseed the resolver; without it the session's RNG continues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// A player tap. Coordinates are 1-based with `y = 1` at the bottom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TapMessage {
    pub seq: u64,
    pub x: i32,
    pub y: i32,
}

/// Discard consumed command logs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClearMessage {
    pub seq: u64,
}

/// Ask for the current board
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SnapshotRequest {
    pub seq: u64,
}

// ============== Resolver -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardType {
    #[serde(rename = "board")]
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionType {
    #[serde(rename = "resolution")]
    Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_position")]
    InvalidPosition,
    #[serde(rename = "bad_request")]
    BadRequest,
    #[serde(rename = "config")]
    Config,
}

impl From<&ResolveError> for ErrorCode {
    fn from(err: &ResolveError) -> Self {
        if err.is_config() {
            ErrorCode::Config
        } else {
            ErrorCode::InvalidPosition
        }
    }
}

/// Full board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMessage {
    #[serde(rename = "type")]
    pub msg_type: BoardType,
    pub seq: u64,
    pub width: u8,
    pub height: u8,
    pub colors: u8,
    /// Kind codes, `kinds[y - 1][x - 1]`, 0 for a gap
    pub kinds: [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    /// Special status codes, same indexing
    pub statuses: [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    pub board_hash: StateHash,
}

/// Everything one tap produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionMessage {
    #[serde(rename = "type")]
    pub msg_type: ResolutionType,
    pub seq: u64,
    pub changed: Vec<TileDto>,
    pub effects: Vec<EffectDto>,
    pub cycles: u32,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDto {
    pub id: u32,
    pub kind: KindLower,
    pub status: StatusLower,
    pub x: i8,
    pub y: i8,
    pub spawn_x: i8,
    pub spawn_y: i8,
    pub dead: bool,
    pub commands: Vec<CommandDto>,
}

/// One entry of a tile's command log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum CommandDto {
    #[serde(rename = "moveTo")]
    MoveTo {
        play_ms: u32,
        keep_ms: u32,
        x: i8,
        y: i8,
    },
    #[serde(rename = "die")]
    Die { play_ms: u32, keep_ms: u32 },
    #[serde(rename = "shake")]
    Shake { play_ms: u32, keep_ms: u32 },
    #[serde(rename = "setVisible")]
    SetVisible {
        play_ms: u32,
        keep_ms: u32,
        visible: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDto {
    pub action: EffectLower,
    pub play_ms: u32,
    pub x: i8,
    pub y: i8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindLower {
    #[serde(rename = "a")]
    A,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "d")]
    D,
    #[serde(rename = "e")]
    E,
    #[serde(rename = "f")]
    F,
    #[serde(rename = "bird")]
    Bird,
}

impl From<TileKind> for KindLower {
    fn from(value: TileKind) -> Self {
        match value {
            TileKind::A => Self::A,
            TileKind::B => Self::B,
            TileKind::C => Self::C,
            TileKind::D => Self::D,
            TileKind::E => Self::E,
            TileKind::F => Self::F,
            TileKind::Bird => Self::Bird,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusLower {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "column")]
    Column,
    #[serde(rename = "wrap")]
    Wrap,
    #[serde(rename = "colorBomb")]
    ColorBomb,
}

impl From<SpecialStatus> for StatusLower {
    fn from(value: SpecialStatus) -> Self {
        match value {
            SpecialStatus::None => Self::None,
            SpecialStatus::Line => Self::Line,
            SpecialStatus::Column => Self::Column,
            SpecialStatus::Wrap => Self::Wrap,
            SpecialStatus::ColorBomb => Self::ColorBomb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectLower {
    #[serde(rename = "crush")]
    Crush,
    #[serde(rename = "rowBomb")]
    RowBomb,
    #[serde(rename = "colBomb")]
    ColBomb,
}

impl From<EffectAction> for EffectLower {
    fn from(value: EffectAction) -> Self {
        match value {
            EffectAction::Crush => Self::Crush,
            EffectAction::RowBomb => Self::RowBomb,
            EffectAction::ColBomb => Self::ColBomb,
        }
    }
}

impl From<&Command> for CommandDto {
    fn from(cmd: &Command) -> Self {
        let (play_ms, keep_ms) = (cmd.play_ms, cmd.keep_ms);
        match cmd.action {
            CommandAction::MoveTo(pos) => Self::MoveTo {
                play_ms,
                keep_ms,
                x: pos.x,
                y: pos.y,
            },
            CommandAction::Die => Self::Die { play_ms, keep_ms },
            CommandAction::Shake => Self::Shake { play_ms, keep_ms },
            CommandAction::SetVisible(visible) => Self::SetVisible {
                play_ms,
                keep_ms,
                visible,
            },
        }
    }
}

impl From<&TileView> for TileDto {
    fn from(view: &TileView) -> Self {
        Self {
            id: view.id.0,
            kind: view.kind.into(),
            status: view.status.into(),
            x: view.pos.x,
            y: view.pos.y,
            spawn_x: view.spawn_pos.x,
            spawn_y: view.spawn_pos.y,
            dead: view.dead,
            commands: view.commands.iter().map(CommandDto::from).collect(),
        }
    }
}

impl From<&Effect> for EffectDto {
    fn from(effect: &Effect) -> Self {
        Self {
            action: effect.action.into(),
            play_ms: effect.play_ms,
            x: effect.pos.x,
            y: effect.pos.y,
            step: effect.step,
        }
    }
}

/// Acknowledgment for requests with no payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    /// Commands discarded by a `clear`
    pub cleared: usize,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Deterministic board hash serialized as lowercase hex (without heap allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut buf = [0u8; 16];
        let mut v = self.0;
        for i in 0..16 {
            buf[15 - i] = HEX[(v & 0x0f) as usize];
            v >>= 4;
        }
        let s = std::str::from_utf8(&buf).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Init(InitMessage),
    Tap(TapMessage),
    Clear(ClearMessage),
    Snapshot(SnapshotRequest),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Init(m) => m.seq,
            ParsedMessage::Tap(m) => m.seq,
            ParsedMessage::Clear(m) => m.seq,
            ParsedMessage::Snapshot(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

const KNOWN_TYPES: [&str; 4] = ["init", "tap", "clear", "snapshot"];

/// Parse a JSON message from a string
///
/// An unrecognized `type` is not a parse error; it comes back as
/// [`ParsedMessage::Unknown`] so the caller can answer with the right `seq`.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "init")]
        Init(InitMessage),
        #[serde(rename = "tap")]
        Tap(TapMessage),
        #[serde(rename = "clear")]
        Clear(ClearMessage),
        #[serde(rename = "snapshot")]
        Snapshot(SnapshotRequest),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Init(m)) => Ok(ParsedMessage::Init(m)),
        Ok(InboundMessage::Tap(m)) => Ok(ParsedMessage::Tap(m)),
        Ok(InboundMessage::Clear(m)) => Ok(ParsedMessage::Clear(m)),
        Ok(InboundMessage::Snapshot(m)) => Ok(ParsedMessage::Snapshot(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            let msg_type = envelope.msg_type.unwrap_or_else(|| "unknown".to_string());
            if KNOWN_TYPES.contains(&msg_type.as_str()) {
                return Err(e);
            }
            Ok(ParsedMessage::Unknown(UnknownMessage {
                seq: envelope.seq.unwrap_or(0),
                msg_type,
            }))
        }
    }
}

/// Best-effort `seq` from a line that failed to parse
pub fn salvage_seq(json: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .and_then(|v| v.get("seq").and_then(|s| s.as_u64()))
        .unwrap_or(0)
}

// ============== Utility Functions ==============

/// Create a board message
pub fn create_board(seq: u64, snap: &BoardSnapshot) -> BoardMessage {
    BoardMessage {
        msg_type: BoardType::Board,
        seq,
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
        colors: snap.colors,
        kinds: snap.kinds,
        statuses: snap.statuses,
        board_hash: StateHash(snap.board_hash),
    }
}

/// Create a resolution message
pub fn create_resolution(seq: u64, res: &Resolution) -> ResolutionMessage {
    ResolutionMessage {
        msg_type: ResolutionType::Resolution,
        seq,
        changed: res.changed.iter().map(TileDto::from).collect(),
        effects: res.effects.iter().map(EffectDto::from).collect(),
        cycles: res.cycles,
        duration_ms: res.duration_ms,
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64, cleared: usize) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        cleared,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GridPos, TileId, DIE_MS, TOUCH_MOVE_MS};

    #[test]
    fn test_parse_init() {
        let json = r#"{"type":"init","seq":1,"colors":5,"seed":42}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Init(msg) => {
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.colors, 5);
                assert_eq!(msg.seed, Some(42));
            }
            other => panic!("Expected Init message, got {:?}", other),
        }

        let json = r#"{"type":"init","seq":2,"colors":4}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Init(msg) => assert_eq!(msg.seed, None),
            other => panic!("Expected Init message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tap() {
        let json = r#"{"type":"tap","seq":7,"x":3,"y":9}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Tap(msg) => {
                assert_eq!(msg.seq, 7);
                assert_eq!((msg.x, msg.y), (3, 9));
            }
            other => panic!("Expected Tap message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_clear_and_snapshot() {
        assert!(matches!(
            parse_message(r#"{"type":"clear","seq":3}"#).unwrap(),
            ParsedMessage::Clear(ClearMessage { seq: 3 })
        ));
        assert!(matches!(
            parse_message(r#"{"type":"snapshot","seq":4}"#).unwrap(),
            ParsedMessage::Snapshot(SnapshotRequest { seq: 4 })
        ));
    }

    #[test]
    fn test_parse_unknown_type() {
        let parsed = parse_message(r#"{"type":"hint","seq":9}"#).unwrap();
        match parsed {
            ParsedMessage::Unknown(m) => {
                assert_eq!(m.seq, 9);
                assert_eq!(m.msg_type, "hint");
            }
            other => panic!("Expected Unknown message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_known_type_is_error() {
        assert!(parse_message(r#"{"type":"tap","seq":1,"x":3}"#).is_err());
        assert!(parse_message("not json").is_err());
        assert_eq!(salvage_seq(r#"{"type":"tap","seq":12,"x":3}"#), 12);
        assert_eq!(salvage_seq("not json"), 0);
    }

    #[test]
    fn test_command_wire_names() {
        let cmd = Command {
            action: CommandAction::MoveTo(GridPos::new(2, 5)),
            play_ms: 500,
            keep_ms: TOUCH_MOVE_MS,
        };
        let json = serde_json::to_string(&CommandDto::from(&cmd)).unwrap();
        assert_eq!(
            json,
            r#"{"action":"moveTo","play_ms":500,"keep_ms":300,"x":2,"y":5}"#
        );

        let cmd = Command {
            action: CommandAction::SetVisible(false),
            play_ms: 0,
            keep_ms: 0,
        };
        let json = serde_json::to_string(&CommandDto::from(&cmd)).unwrap();
        assert!(json.contains(r#""action":"setVisible""#));
        assert!(json.contains(r#""visible":false"#));

        let cmd = Command {
            action: CommandAction::Die,
            play_ms: 300,
            keep_ms: DIE_MS,
        };
        let json = serde_json::to_string(&CommandDto::from(&cmd)).unwrap();
        assert!(json.starts_with(r#"{"action":"die""#));
    }

    #[test]
    fn test_effect_step_is_optional() {
        let crush = Effect {
            action: EffectAction::Crush,
            play_ms: 300,
            pos: GridPos::new(1, 1),
            step: Some(0),
        };
        let json = serde_json::to_string(&EffectDto::from(&crush)).unwrap();
        assert!(json.contains(r#""action":"crush""#));
        assert!(json.contains(r#""step":0"#));

        let row = Effect {
            action: EffectAction::RowBomb,
            step: None,
            ..crush
        };
        let json = serde_json::to_string(&EffectDto::from(&row)).unwrap();
        assert!(json.contains(r#""action":"rowBomb""#));
        assert!(!json.contains("step"));
    }

    #[test]
    fn test_tile_dto_from_view() {
        let view = TileView {
            id: TileId(11),
            kind: TileKind::Bird,
            status: SpecialStatus::ColorBomb,
            pos: GridPos::new(4, 2),
            spawn_pos: GridPos::new(4, 2),
            dead: false,
            commands: Vec::new(),
        };
        let dto = TileDto::from(&view);
        assert_eq!(dto.id, 11);
        assert_eq!(dto.kind, KindLower::Bird);
        assert_eq!(dto.status, StatusLower::ColorBomb);
        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains(r#""status":"colorBomb""#));
        assert!(json.contains(r#""kind":"bird""#));
    }

    #[test]
    fn test_error_codes() {
        let err = ResolveError::InvalidPosition { x: 0, y: 1 };
        assert_eq!(ErrorCode::from(&err), ErrorCode::InvalidPosition);
        let err = ResolveError::ColorCount {
            requested: 9,
            min: 3,
            max: 6,
        };
        assert_eq!(ErrorCode::from(&err), ErrorCode::Config);
        let err = ResolveError::Layout("short row".into());
        assert_eq!(ErrorCode::from(&err), ErrorCode::Config);

        let msg = create_error(5, ErrorCode::Config, "bad");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"error","seq":5,"code":"config","message":"bad"}"#
        );
    }

    #[test]
    fn test_state_hash_hex() {
        let json = serde_json::to_string(&StateHash(0xabc)).unwrap();
        assert_eq!(json, r#""0000000000000abc""#);
        let parsed: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StateHash(0xabc));
    }

    #[test]
    fn test_serde_roundtrip() {
        let ack = create_ack(10, 4);
        let json = serde_json::to_string(&ack).unwrap();
        let parsed: AckMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.seq, ack.seq);
        assert_eq!(parsed.cleared, 4);
        assert_eq!(parsed.msg_type, AckType::Ack);
    }
}
