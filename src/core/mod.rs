//! Core lexical layer
//!
//! Fundamental building blocks for tolerant markup parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: lazily produced marker stream with source spans
//! - Entities: character-reference decoding with Cow (zero-copy when possible)
//! - Attributes: attribute-blob parsing and serialization

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
