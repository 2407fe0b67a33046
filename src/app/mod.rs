// AmfDigest - app/mod.rs
//
// Application layer: input acquisition and the processing loop.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod pipeline;
pub mod source;
