pub mod account;
pub mod chat;
pub mod config;
pub mod videos;
pub mod worksheet;
