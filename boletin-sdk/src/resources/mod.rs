//! API resource clients
//!
//! This module contains clients for each API resource type.

pub mod analysis;
pub mod health;
