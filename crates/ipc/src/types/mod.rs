//! Data types carried by IPC messages.

mod bridge;
mod session;

pub use bridge::*;
pub use session::*;
