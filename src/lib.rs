//! Javlabot - an IRC bot that swears at people in Swedish when they talk too much

pub mod commands;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod normalize;
pub mod protocol;
pub mod telemetry;
pub mod template;
pub mod trigger;
