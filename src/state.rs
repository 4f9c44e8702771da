//! 애플리케이션 상태 관리

use crate::config::Config;
use crate::game::GameRoom;
use crate::protocol::ServerMessage;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc::UnboundedSender, RwLock};

/// 전역 애플리케이션 상태
pub struct AppState {
    /// 단일 공유 게임 방. 쓰기 잠금이 각 조작 전체를 감싸서
    /// 동시 제출 간 승자 판정이 직렬화됨
    pub room: RwLock<GameRoom>,
    /// 피어 세션 (peer_id -> PeerSession)
    pub peers: DashMap<String, PeerSession>,
    /// 설정
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            room: RwLock::new(GameRoom::new(config.room.max_players)),
            peers: DashMap::new(),
            config: Arc::new(config),
        }
    }
}

/// 피어 세션 정보
pub struct PeerSession {
    #[allow(dead_code)]
    pub id: String,
    pub sender: UnboundedSender<ServerMessage>,
    #[allow(dead_code)]
    pub connected_at: Instant,
}
