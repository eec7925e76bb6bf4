//! Lyrics tools library - shared modules for all binaries.

pub mod cleanup;
pub mod config;
pub mod fetch;
pub mod listing;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod safety;
pub mod sources;
pub mod structure;
pub mod wordcount;
