//! Command payload types for IPC messages.

mod export;

pub use export::*;
