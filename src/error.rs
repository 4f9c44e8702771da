//! 사용자 대상 거절 오류 정의

use thiserror::Error;

/// 게임 조작이 거절될 때의 사유. 요청한 연결에만 전달되며 절대 브로드캐스트하지 않음
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("최대 플레이어 수(4명)에 도달했습니다.")]
    RoomFull,
    #[error("게임이 진행 중입니다. 다음 라운드를 기다려주세요.")]
    RoundInProgress,
    #[error("게임이 이미 진행 중입니다.")]
    AlreadyPlaying,
    #[error("플레이어가 없습니다.")]
    NoPlayers,
    #[error("이미 참가한 세션입니다.")]
    AlreadyJoined,
    #[error("닉네임을 입력해주세요.")]
    MissingNickname,
    #[error("어드민 비밀번호가 틀렸습니다.")]
    InvalidAdminPassword,
    #[error("어드민만 수행할 수 있는 작업입니다.")]
    NotAuthorized,
}

impl GameError {
    /// 클라이언트가 분기할 수 있는 안정적인 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            GameError::RoomFull => "ROOM_FULL",
            GameError::RoundInProgress => "ROUND_IN_PROGRESS",
            GameError::AlreadyPlaying => "ALREADY_PLAYING",
            GameError::NoPlayers => "NO_PLAYERS",
            GameError::AlreadyJoined => "ALREADY_JOINED",
            GameError::MissingNickname => "MISSING_NICKNAME",
            GameError::InvalidAdminPassword => "INVALID_ADMIN_PASSWORD",
            GameError::NotAuthorized => "NOT_AUTHORIZED",
        }
    }
}
