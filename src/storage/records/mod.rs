pub(crate) mod matching;
pub(crate) mod message;
pub(crate) mod user;
