//! 게임 진행 핸들러

use crate::error::GameError;
use crate::game::{Language, Phase, Role};
use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// 게임 참가 처리
pub async fn handle_join(
    state: Arc<AppState>,
    peer_id: &str,
    sender: &UnboundedSender<ServerMessage>,
    nickname: &str,
    role: Role,
    password: Option<&str>,
) {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        send_error(sender, &GameError::MissingNickname);
        return;
    }
    if role == Role::Admin && password != Some(state.config.admin_password.as_str()) {
        tracing::warn!(peer_id = %peer_id, "Admin join with wrong password");
        send_error(sender, &GameError::InvalidAdminPassword);
        return;
    }

    // 방 잠금은 스코프로 제한하고 브로드캐스트는 해제 후 수행
    let (room_info, ids) = {
        let mut room = state.room.write().await;
        if let Err(err) = room.join(peer_id, nickname, role) {
            tracing::warn!(peer_id = %peer_id, code = %err.code(), "Join rejected");
            send_error(sender, &err);
            return;
        }
        (room.info(), room.participant_ids())
    };

    let _ = sender.send(ServerMessage::Joined {
        role,
        nickname: nickname.to_string(),
        room_info: room_info.clone(),
    });
    broadcast(&state, &ids, ServerMessage::RoomUpdate { room_info });
    broadcast(
        &state,
        &ids,
        ServerMessage::PlayerJoined {
            nickname: nickname.to_string(),
            role,
        },
    );

    tracing::info!(peer_id = %peer_id, nickname = %nickname, role = ?role, "Participant joined");
}

/// 라운드 시작 처리 (어드민 전용)
pub async fn handle_start_game(
    state: Arc<AppState>,
    peer_id: &str,
    sender: &UnboundedSender<ServerMessage>,
    language: Option<&str>,
) {
    let (sentence, room_info, ids) = {
        let mut room = state.room.write().await;
        if !room.is_admin(peer_id) {
            send_error(sender, &GameError::NotAuthorized);
            return;
        }
        let language = language.map(Language::from_tag).unwrap_or(Language::Korean);
        match room.start_round(language) {
            Ok(sentence) => (sentence, room.info(), room.participant_ids()),
            Err(err) => {
                tracing::warn!(peer_id = %peer_id, code = %err.code(), "Start rejected");
                send_error(sender, &err);
                return;
            }
        }
    };

    tracing::info!(peer_id = %peer_id, sentence = %sentence, "Round started");

    broadcast(
        &state,
        &ids,
        ServerMessage::GameStarted {
            sentence,
            room_info,
        },
    );
}

/// 타이핑 갱신 처리. 라운드 진행 중이 아니면 무시
pub async fn handle_typing(state: Arc<AppState>, peer_id: &str, text: &str) {
    let (status, players, room_info, ids) = {
        let mut room = state.room.write().await;
        if room.phase() != Phase::Playing {
            return;
        }
        let Some(status) = room.update_typing(peer_id, text) else {
            return;
        };
        (status, room.roster(), room.info(), room.participant_ids())
    };

    broadcast(
        &state,
        &ids,
        ServerMessage::TypingBroadcast {
            players,
            room_info: room_info.clone(),
        },
    );

    if status.is_winner {
        tracing::info!(
            winner = %status.nickname,
            finish_time = ?status.finish_time,
            "Round won"
        );
        broadcast(
            &state,
            &ids,
            ServerMessage::GameOver {
                winner: status.nickname,
                finish_time: status.finish_time,
                room_info,
            },
        );
    }
}

/// 라운드 리셋 처리 (어드민 전용)
pub async fn handle_reset_game(
    state: Arc<AppState>,
    peer_id: &str,
    sender: &UnboundedSender<ServerMessage>,
) {
    let (room_info, ids) = {
        let mut room = state.room.write().await;
        if !room.is_admin(peer_id) {
            send_error(sender, &GameError::NotAuthorized);
            return;
        }
        room.reset_round();
        (room.info(), room.participant_ids())
    };

    tracing::info!(peer_id = %peer_id, "Round reset");

    broadcast(&state, &ids, ServerMessage::GameReset { room_info });
}

/// 방 상태 조회. 요청한 연결에만 응답
pub async fn handle_room_info(state: Arc<AppState>, sender: &UnboundedSender<ServerMessage>) {
    let room_info = state.room.read().await.info();
    let _ = sender.send(ServerMessage::RoomUpdate { room_info });
}

/// 방 참가자 전원에게 메시지 브로드캐스트
pub fn broadcast(state: &AppState, participant_ids: &[String], message: ServerMessage) {
    for peer_id in participant_ids {
        if let Some(session) = state.peers.get(peer_id) {
            let _ = session.sender.send(message.clone());
        }
    }
}

/// 거절 사유를 요청한 연결에만 전달
pub fn send_error(sender: &UnboundedSender<ServerMessage>, err: &GameError) {
    let _ = sender.send(ServerMessage::Error {
        code: err.code().to_string(),
        message: err.to_string(),
    });
}
