//! Command modules for gacha.
//!
//! Each module handles a category of operations.

pub mod draw;
pub mod event;
pub mod participant;
