//! Foundation module - Core utilities and types
//!
//! This module provides the small utilities every sample leans on:
//! - Math types and transform composition
//! - Frame timing
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
