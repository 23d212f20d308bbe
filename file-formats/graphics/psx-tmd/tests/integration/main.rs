//! Integration tests for TMD decoding and displacement animation

mod animation;
mod decoder;
