//! A small UNO server: clients join a shared lobby over TCP, ready up, and
//! play one game at a time using a plain-text line protocol.

pub mod config;
pub mod error;
pub mod game;
pub mod lobby;
pub mod ports;
pub mod protocol;
pub mod server;
pub mod telemetry;
