//! 핸들러 모듈

pub mod connection;
pub mod game;

pub use connection::*;
pub use game::*;
