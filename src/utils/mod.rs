//! # Utilities Module
//!
//! Utility functions for stat mathematics.

pub mod math;

pub use math::*;
