//! Core Inquiro library (domain types, config, credentials, transport).

pub mod chat;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod transport;
