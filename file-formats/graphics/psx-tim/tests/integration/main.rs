//! Integration tests for TIM decoding and atlas compositing

mod compositing;
mod fixtures;
