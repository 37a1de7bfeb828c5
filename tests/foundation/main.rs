//! Integration tests for Layer 0: Foundation
//!
//! Tests for facts, the interner, fact sets, and error types.

mod facts;
