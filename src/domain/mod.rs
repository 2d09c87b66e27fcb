pub mod auth;
pub mod matching;
pub mod message;
pub mod user;
