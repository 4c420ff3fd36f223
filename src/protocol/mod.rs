//! Monitor-feed protocol handling
//!
//! This module decodes lines of a redis MONITOR feed into commands and
//! provides the RESP codec used to forward them to the destination.

pub mod command;
pub mod monitor;
pub mod resp;

pub use command::Command;
