//! 게임 방 상태 머신

use crate::error::GameError;
use crate::game::sentences::{self, Language};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// 참가자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Spectator,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Player
    }
}

/// 방의 라운드 진행 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Waiting,
    Playing,
    Finished,
}

/// 목표 문장과 입력의 문자 단위 불일치
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingError {
    pub position: usize,
    pub expected: char,
    pub actual: char,
}

/// 연결된 참가자. 게임 필드는 Player 역할에서만 의미가 있음
#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub sid: String,
    pub nickname: String,
    pub role: Role,
    pub current_input: String,
    pub is_finished: bool,
    /// 라운드 시작 이후 경과 시간(초)
    pub finish_time: Option<f64>,
    pub errors: Vec<TypingError>,
}

impl Participant {
    fn new(sid: String, nickname: String, role: Role) -> Self {
        Self {
            sid,
            nickname,
            role,
            current_input: String::new(),
            is_finished: false,
            finish_time: None,
            errors: Vec::new(),
        }
    }

    fn clear_round(&mut self) {
        self.current_input.clear();
        self.is_finished = false;
        self.finish_time = None;
        self.errors.clear();
    }
}

/// 라운드 승자. 로스터 항목에 대한 id 역참조이며, 표시용 닉네임은
/// 승자가 리셋 전에 나가더라도 유지되도록 함께 보관
#[derive(Debug, Clone)]
pub struct Winner {
    #[allow(dead_code)]
    pub sid: String,
    pub nickname: String,
}

/// 타이핑 갱신 한 건의 처리 결과
#[derive(Debug, Clone, Serialize)]
pub struct TypingStatus {
    pub nickname: String,
    pub current_input: String,
    pub errors: Vec<TypingError>,
    pub is_finished: bool,
    /// 이 호출로 승자가 확정된 경우에만 true
    pub is_winner: bool,
    pub finish_time: Option<f64>,
    pub progress: f64,
}

/// 방 상태 스냅샷
#[derive(Debug, Clone, Serialize)]
pub struct RoomInfo {
    pub phase: Phase,
    pub player_count: usize,
    pub spectator_count: usize,
    pub admin_count: usize,
    pub current_sentence: String,
    pub winner: Option<String>,
    pub players: Vec<Participant>,
}

/// 단일 공유 게임 방. 모든 조작은 방 잠금을 잡은 채 끝까지 실행되므로
/// 필드 단위 교차 없이 직렬화됨 (승자 판정의 정확성이 여기에 의존)
pub struct GameRoom {
    phase: Phase,
    /// 참가 순서가 로스터 순서
    players: Vec<Participant>,
    spectators: HashMap<String, Participant>,
    admins: HashMap<String, Participant>,
    current_sentence: String,
    language: Language,
    winner: Option<Winner>,
    round_start: Option<Instant>,
    max_players: usize,
}

impl GameRoom {
    pub fn new(max_players: usize) -> Self {
        Self {
            phase: Phase::Waiting,
            players: Vec::new(),
            spectators: HashMap::new(),
            admins: HashMap::new(),
            current_sentence: String::new(),
            language: Language::Korean,
            winner: None,
            round_start: None,
            max_players,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn language(&self) -> Language {
        self.language
    }

    /// 세 파티션 중 하나라도 해당 id를 갖고 있는지 확인
    pub fn contains(&self, sid: &str) -> bool {
        self.players.iter().any(|p| p.sid == sid)
            || self.spectators.contains_key(sid)
            || self.admins.contains_key(sid)
    }

    pub fn is_admin(&self, sid: &str) -> bool {
        self.admins.contains_key(sid)
    }

    /// 브로드캐스트 대상: 역할에 관계없이 방에 참가한 모든 세션 id
    pub fn participant_ids(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| p.sid.clone())
            .chain(self.spectators.keys().cloned())
            .chain(self.admins.keys().cloned())
            .collect()
    }

    /// 참가 처리. 하나의 세션 id는 하나의 역할만 가질 수 있음
    pub fn join(&mut self, sid: &str, nickname: &str, role: Role) -> Result<(), GameError> {
        if self.contains(sid) {
            return Err(GameError::AlreadyJoined);
        }
        match role {
            Role::Player => {
                if self.players.len() >= self.max_players {
                    return Err(GameError::RoomFull);
                }
                if self.phase == Phase::Playing {
                    return Err(GameError::RoundInProgress);
                }
                self.players
                    .push(Participant::new(sid.to_string(), nickname.to_string(), role));
            }
            Role::Spectator => {
                self.spectators.insert(
                    sid.to_string(),
                    Participant::new(sid.to_string(), nickname.to_string(), role),
                );
            }
            Role::Admin => {
                self.admins.insert(
                    sid.to_string(),
                    Participant::new(sid.to_string(), nickname.to_string(), role),
                );
            }
        }
        Ok(())
    }

    /// id를 보유한 파티션에서 제거. 없는 id는 무시
    pub fn remove(&mut self, sid: &str) {
        if let Some(idx) = self.players.iter().position(|p| p.sid == sid) {
            self.players.remove(idx);
        } else if self.spectators.remove(sid).is_none() {
            self.admins.remove(sid);
        }
    }

    /// 새 라운드 시작. Finished 상태에서도 리셋 없이 다음 라운드를 열 수 있음
    pub fn start_round(&mut self, language: Language) -> Result<String, GameError> {
        if self.phase == Phase::Playing {
            return Err(GameError::AlreadyPlaying);
        }
        if self.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        self.language = language;
        let sentence = sentences::random_sentence(language).to_string();
        self.begin_round(sentence);
        Ok(self.current_sentence.clone())
    }

    fn begin_round(&mut self, sentence: String) {
        self.current_sentence = sentence;
        self.phase = Phase::Playing;
        self.winner = None;
        self.round_start = Some(Instant::now());
        for player in &mut self.players {
            player.clear_round();
        }
    }

    /// 플레이어의 타이핑 갱신 처리. 플레이어가 아닌 id는 None
    pub fn update_typing(&mut self, sid: &str, text: &str) -> Option<TypingStatus> {
        if !self.players.iter().any(|p| p.sid == sid) {
            return None;
        }

        let errors = char_errors(&self.current_sentence, text);
        let target_len = self.current_sentence.chars().count();
        let progress = if target_len == 0 {
            0.0
        } else {
            text.chars().count() as f64 / target_len as f64 * 100.0
        };
        let matched = text == self.current_sentence;
        let elapsed = self.round_start.map(|start| start.elapsed().as_secs_f64());

        let mut is_winner = false;
        let player = self.players.iter_mut().find(|p| p.sid == sid)?;
        player.current_input = text.to_string();
        player.errors = errors.clone();

        if matched && !player.is_finished {
            player.is_finished = true;
            player.finish_time = elapsed;
            // 유일한 승자 판정 지점: 먼저 비어 있는 winner를 본 호출이 이김
            if self.winner.is_none() {
                self.winner = Some(Winner {
                    sid: player.sid.clone(),
                    nickname: player.nickname.clone(),
                });
                self.phase = Phase::Finished;
                is_winner = true;
            }
        }

        Some(TypingStatus {
            nickname: player.nickname.clone(),
            current_input: text.to_string(),
            errors,
            is_finished: player.is_finished,
            is_winner,
            finish_time: player.finish_time,
            progress,
        })
    }

    /// 무조건 Waiting으로 복귀. 권한 확인은 호출자 책임
    pub fn reset_round(&mut self) {
        self.phase = Phase::Waiting;
        self.current_sentence.clear();
        self.winner = None;
        self.round_start = None;
        for player in &mut self.players {
            player.clear_round();
        }
    }

    /// 플레이어 로스터 스냅샷 (참가 순서)
    pub fn roster(&self) -> Vec<Participant> {
        self.players.clone()
    }

    /// 방 상태 스냅샷. 대기 중에는 정답 유출을 막기 위해 문장을 비움
    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            phase: self.phase,
            player_count: self.players.len(),
            spectator_count: self.spectators.len(),
            admin_count: self.admins.len(),
            current_sentence: if self.phase == Phase::Waiting {
                String::new()
            } else {
                self.current_sentence.clone()
            },
            winner: self.winner.as_ref().map(|w| w.nickname.clone()),
            players: self.players.clone(),
        }
    }
}

/// 입력과 목표 문장의 문자 단위 비교. 목표 길이를 넘는 인덱스는 오류로 치지 않음
fn char_errors(target: &str, text: &str) -> Vec<TypingError> {
    let target_chars: Vec<char> = target.chars().collect();
    text.chars()
        .enumerate()
        .filter_map(|(position, actual)| {
            target_chars.get(position).and_then(|&expected| {
                (expected != actual).then_some(TypingError {
                    position,
                    expected,
                    actual,
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_players(nicknames: &[&str]) -> GameRoom {
        let mut room = GameRoom::new(4);
        for (i, nickname) in nicknames.iter().enumerate() {
            room.join(&format!("sid-{i}"), nickname, Role::Player).unwrap();
        }
        room
    }

    #[test]
    fn fifth_player_is_rejected() {
        let mut room = room_with_players(&["a", "b", "c", "d"]);
        assert_eq!(
            room.join("sid-5", "e", Role::Player),
            Err(GameError::RoomFull)
        );
        assert_eq!(room.info().player_count, 4);
    }

    #[test]
    fn player_join_rejected_while_playing() {
        let mut room = room_with_players(&["a"]);
        room.start_round(Language::English).unwrap();
        assert_eq!(
            room.join("sid-9", "late", Role::Player),
            Err(GameError::RoundInProgress)
        );
    }

    #[test]
    fn spectator_and_admin_join_ignore_capacity_and_phase() {
        let mut room = room_with_players(&["a", "b", "c", "d"]);
        room.start_round(Language::Korean).unwrap();
        room.join("spec-1", "watcher", Role::Spectator).unwrap();
        room.join("admin-1", "boss", Role::Admin).unwrap();
        let info = room.info();
        assert_eq!(info.spectator_count, 1);
        assert_eq!(info.admin_count, 1);
    }

    #[test]
    fn duplicate_sid_cannot_hold_two_roles() {
        let mut room = GameRoom::new(4);
        room.join("sid-0", "a", Role::Spectator).unwrap();
        assert_eq!(
            room.join("sid-0", "a", Role::Player),
            Err(GameError::AlreadyJoined)
        );
    }

    #[test]
    fn start_without_players_fails_and_keeps_phase() {
        let mut room = GameRoom::new(4);
        assert_eq!(room.start_round(Language::Korean), Err(GameError::NoPlayers));
        assert_eq!(room.phase(), Phase::Waiting);
    }

    #[test]
    fn double_start_is_rejected_and_sentence_unchanged() {
        let mut room = room_with_players(&["a"]);
        let first = room.start_round(Language::English).unwrap();
        assert_eq!(
            room.start_round(Language::English),
            Err(GameError::AlreadyPlaying)
        );
        assert_eq!(room.info().current_sentence, first);
    }

    #[test]
    fn language_is_retained_across_reset() {
        let mut room = room_with_players(&["a"]);
        room.start_round(Language::English).unwrap();
        room.reset_round();
        assert_eq!(room.language(), Language::English);
    }

    #[test]
    fn start_resets_player_round_fields() {
        let mut room = room_with_players(&["a"]);
        room.begin_round("cat".to_string());
        room.update_typing("sid-0", "cat").unwrap();
        room.reset_round();
        room.start_round(Language::English).unwrap();
        let roster = room.roster();
        assert_eq!(roster[0].current_input, "");
        assert!(!roster[0].is_finished);
        assert!(roster[0].finish_time.is_none());
        assert!(roster[0].errors.is_empty());
    }

    #[test]
    fn errors_are_exact_char_mismatches_in_order() {
        let mut room = room_with_players(&["a"]);
        room.begin_round("가는 말".to_string());
        let status = room.update_typing("sid-0", "가은 발").unwrap();
        assert_eq!(
            status.errors,
            vec![
                TypingError { position: 1, expected: '는', actual: '은' },
                TypingError { position: 3, expected: '말', actual: '발' },
            ]
        );
        assert!(!status.is_finished);
    }

    #[test]
    fn overtyped_tail_is_not_flagged_as_error() {
        let mut room = room_with_players(&["a"]);
        room.begin_round("cat".to_string());
        let status = room.update_typing("sid-0", "cattle").unwrap();
        assert!(status.errors.is_empty());
        assert!(!status.is_finished);
        assert_eq!(status.progress, 200.0);
    }

    #[test]
    fn cad_against_cat_scenario() {
        let mut room = room_with_players(&["a"]);
        room.begin_round("cat".to_string());
        let status = room.update_typing("sid-0", "cad").unwrap();
        assert_eq!(
            status.errors,
            vec![TypingError { position: 2, expected: 't', actual: 'd' }]
        );
        assert!(!status.is_finished);
        assert_eq!(status.progress, 100.0);
    }

    #[test]
    fn exact_match_finishes_once_with_full_progress() {
        let mut room = room_with_players(&["a"]);
        room.begin_round("cat".to_string());
        let status = room.update_typing("sid-0", "cat").unwrap();
        assert!(status.is_finished);
        assert!(status.is_winner);
        assert_eq!(status.progress, 100.0);
        assert!(status.finish_time.is_some());
        assert_eq!(room.phase(), Phase::Finished);

        // 이미 완주한 플레이어의 재제출은 승자 판정에 다시 들어가지 않음
        let again = room.update_typing("sid-0", "cat").unwrap();
        assert!(again.is_finished);
        assert!(!again.is_winner);
    }

    #[test]
    fn finished_flag_is_monotonic_within_round() {
        let mut room = room_with_players(&["a", "b"]);
        room.begin_round("cat".to_string());
        room.update_typing("sid-0", "cat").unwrap();
        let status = room.update_typing("sid-0", "ca").unwrap();
        assert!(status.is_finished);
        assert!(room.roster()[0].is_finished);
    }

    #[test]
    fn first_finisher_wins_second_finishes_without_winning() {
        let mut room = room_with_players(&["a", "b"]);
        room.begin_round("cat".to_string());

        let first = room.update_typing("sid-0", "cat").unwrap();
        assert!(first.is_winner);
        assert_eq!(room.phase(), Phase::Finished);

        let second = room.update_typing("sid-1", "cat").unwrap();
        assert!(second.is_finished);
        assert!(!second.is_winner);
        assert!(second.finish_time.is_some());
        assert_eq!(room.info().winner.as_deref(), Some("a"));
    }

    #[test]
    fn typing_from_non_player_is_ignored() {
        let mut room = room_with_players(&["a"]);
        room.join("spec-1", "watcher", Role::Spectator).unwrap();
        room.begin_round("cat".to_string());
        assert!(room.update_typing("spec-1", "cat").is_none());
        assert!(room.update_typing("ghost", "cat").is_none());
        assert!(room.info().winner.is_none());
    }

    #[test]
    fn reset_returns_to_waiting_from_any_phase() {
        let mut room = room_with_players(&["a"]);
        room.reset_round();
        assert_eq!(room.phase(), Phase::Waiting);

        room.begin_round("cat".to_string());
        room.reset_round();
        assert_eq!(room.phase(), Phase::Waiting);

        room.begin_round("cat".to_string());
        room.update_typing("sid-0", "cat").unwrap();
        assert_eq!(room.phase(), Phase::Finished);
        room.reset_round();
        let info = room.info();
        assert_eq!(info.phase, Phase::Waiting);
        assert_eq!(info.current_sentence, "");
        assert!(info.winner.is_none());
        assert!(!info.players[0].is_finished);
    }

    #[test]
    fn start_allowed_after_finish_without_reset() {
        let mut room = room_with_players(&["a"]);
        room.begin_round("cat".to_string());
        room.update_typing("sid-0", "cat").unwrap();
        assert_eq!(room.phase(), Phase::Finished);
        room.start_round(Language::Korean).unwrap();
        assert_eq!(room.phase(), Phase::Playing);
        assert!(room.info().winner.is_none());
    }

    #[test]
    fn sentence_is_suppressed_while_waiting() {
        let mut room = room_with_players(&["a"]);
        room.start_round(Language::Korean).unwrap();
        room.reset_round();
        assert_eq!(room.info().current_sentence, "");
    }

    #[test]
    fn winner_display_survives_disconnect() {
        let mut room = room_with_players(&["a", "b"]);
        room.begin_round("cat".to_string());
        room.update_typing("sid-0", "cat").unwrap();
        room.remove("sid-0");
        assert_eq!(room.info().winner.as_deref(), Some("a"));
    }

    #[test]
    fn remove_clears_each_partition() {
        let mut room = room_with_players(&["a"]);
        room.join("spec-1", "w", Role::Spectator).unwrap();
        room.join("admin-1", "m", Role::Admin).unwrap();
        room.remove("sid-0");
        room.remove("spec-1");
        room.remove("admin-1");
        room.remove("nobody");
        let info = room.info();
        assert_eq!(info.player_count, 0);
        assert_eq!(info.spectator_count, 0);
        assert_eq!(info.admin_count, 0);
    }

    #[test]
    fn roster_preserves_join_order() {
        let room = room_with_players(&["a", "b", "c"]);
        let nicknames: Vec<String> =
            room.roster().into_iter().map(|p| p.nickname).collect();
        assert_eq!(nicknames, vec!["a", "b", "c"]);
    }
}
