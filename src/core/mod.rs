// AmfDigest - core/mod.rs
//
// Core business logic layer: extraction, classification, deduplication,
// and event rendering.
// Must NOT depend on: platform, app, or open files/streams directly.

pub mod classifier;
pub mod emitter;
pub mod extract;
pub mod model;
pub mod output;
