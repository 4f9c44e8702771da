//! 문장 코퍼스 및 무작위 선택

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// 문장 언어 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Korean,
    English,
    Mixed,
}

impl Language {
    /// 클라이언트가 보낸 태그를 파싱. 알 수 없는 값은 혼합 코퍼스로 처리
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "korean" => Language::Korean,
            "english" => Language::English,
            _ => Language::Mixed,
        }
    }
}

const KOREAN_SENTENCES: [&str; 10] = [
    "빠른 갈색 여우가 게으른 개를 뛰어넘습니다",
    "오늘 날씨가 정말 좋습니다",
    "프로그래밍은 재미있는 활동입니다",
    "커피 한 잔의 여유를 즐기세요",
    "인생은 짧고 예술은 길다",
    "천 리 길도 한 걸음부터 시작한다",
    "호랑이에게 물려가도 정신만 차리면 산다",
    "가는 말이 고와야 오는 말이 곱다",
    "낮말은 새가 듣고 밤말은 쥐가 듣는다",
    "백문이 불여일견이라는 말이 있다",
];

const ENGLISH_SENTENCES: [&str; 10] = [
    "The quick brown fox jumps over the lazy dog",
    "Hello world this is a typing test",
    "Programming is fun and creative",
    "Practice makes perfect every day",
    "Life is short art is long",
    "A journey of a thousand miles begins with a single step",
    "To be or not to be that is the question",
    "All that glitters is not gold",
    "Better late than never they say",
    "Actions speak louder than words",
];

/// 요청된 카테고리에서 균등 확률로 문장 하나 선택
pub fn random_sentence(language: Language) -> &'static str {
    let mut rng = rand::thread_rng();
    match language {
        Language::Korean => KOREAN_SENTENCES
            .choose(&mut rng)
            .copied()
            .unwrap_or(KOREAN_SENTENCES[0]),
        Language::English => ENGLISH_SENTENCES
            .choose(&mut rng)
            .copied()
            .unwrap_or(ENGLISH_SENTENCES[0]),
        Language::Mixed => {
            let all: Vec<&'static str> = KOREAN_SENTENCES
                .iter()
                .chain(ENGLISH_SENTENCES.iter())
                .copied()
                .collect();
            all.choose(&mut rng).copied().unwrap_or(KOREAN_SENTENCES[0])
        }
    }
}
