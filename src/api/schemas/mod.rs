pub mod auth;
pub mod gateway;
pub mod health;
pub mod matches;
pub mod profile;
