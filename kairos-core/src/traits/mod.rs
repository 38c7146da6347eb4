//! Hardware abstraction traits
//!
//! These traits define the interface between application logic and
//! chip-specific clock drivers.

pub mod clock;

pub use clock::RealTimeClock;
