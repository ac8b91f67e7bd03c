//! Domain types and pure content logic for the document platform.
//!
//! Everything in this crate is side-effect free: entities, the item
//! lifecycle rules, the markdown-lite parser, and chart normalization.
//! Storage, generation, and document assembly live in the sibling crates
//! and consume these types.

pub mod chart;
pub mod error;
pub mod markdown;
pub mod project;
pub mod types;
