pub mod account_service;
pub mod chat_service;
pub mod gateway;
pub mod health_service;
pub mod match_service;
pub mod presence;
pub mod rooms;
pub mod similarity;
