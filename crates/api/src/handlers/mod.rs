//! Request handlers.
//!
//! Each submodule provides the async handler functions for one slice of
//! the API. Handlers own request validation, ownership checks, and the
//! degrade-on-failure policy for generation calls; persistence goes
//! through [`docforge_store::mutate`] so every write carries the version
//! compare-and-swap.

pub mod export;
pub mod generate;
pub mod item;
pub mod project;
