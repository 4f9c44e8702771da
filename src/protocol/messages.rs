//! 클라이언트-서버 메시지 프로토콜 정의

use crate::game::{Participant, Role, RoomInfo};
use serde::{Deserialize, Serialize};

/// 클라이언트 → 서버 메시지
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    // Connection
    Heartbeat,

    // Room Management
    JoinGame {
        nickname: String,
        #[serde(default)]
        role: Role,
        #[serde(default)]
        password: Option<String>,
    },

    // Game Control (admin only)
    StartGame {
        #[serde(default)]
        language: Option<String>,
    },
    ResetGame,

    // Gameplay
    TypingUpdate {
        text: String,
    },

    // Query
    GetRoomInfo,
}

/// 서버 → 클라이언트 메시지
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    // Connection
    Connected {
        socket_id: String,
    },
    HeartbeatAck,
    Error {
        code: String,
        message: String,
    },

    // Room Events
    Joined {
        role: Role,
        nickname: String,
        room_info: RoomInfo,
    },
    RoomUpdate {
        room_info: RoomInfo,
    },
    PlayerJoined {
        nickname: String,
        role: Role,
    },

    // Game Events
    GameStarted {
        sentence: String,
        room_info: RoomInfo,
    },
    TypingBroadcast {
        players: Vec<Participant>,
        room_info: RoomInfo,
    },
    GameOver {
        winner: String,
        finish_time: Option<f64>,
        room_info: RoomInfo,
    },
    GameReset {
        room_info: RoomInfo,
    },
}
