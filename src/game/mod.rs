//! 게임 코어 모듈

pub mod room;
pub mod sentences;

pub use room::*;
pub use sentences::*;
