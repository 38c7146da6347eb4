//! Real-time clock drivers

pub mod mcp7940m;
// pub mod mcp7940n;  // Future: battery switchover registers

pub use mcp7940m::{Mcp7940m, RtcError, Status};
