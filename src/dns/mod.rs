//! DNS module.
//!
//! This module provides resolver probing:
//! - Core data types (targets, samples, result sets)
//! - The order-preserving prober
//! - ICMP echo as the production probe

pub mod icmp;
pub mod prober;
pub mod types;

pub use icmp::IcmpPinger;
pub use prober::{Pinger, Prober};
pub use types::*;
