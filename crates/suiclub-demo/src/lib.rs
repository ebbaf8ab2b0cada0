//! suiclub demo library entry.
//!
//! Wires config, chain access (JSON-RPC reads + CLI-signed transactions),
//! the social coin and club clients, and the scripted scenario. Consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod chain;
pub mod club;
pub mod coins;
pub mod config;
pub mod scenario;
pub mod socialcoin;
