//! Common utilities for the cardgen renderer.
//!
//! This crate provides shared infrastructure used by the markup engine and
//! the card compositor:
//! - **Warning System** - colored, deduplicated terminal output for lenient
//!   input handling (unknown colors, undecodable images)
//! - **Image Data** - decoded RGBA pixels shared between loader and renderer

pub mod image;
pub mod warning;
