//! Explanation system for Sylloge.
//!
//! Answers "why is this fact known?" from a recorded trace:
//! - [`WhyQuery::why`] - the rule that produced a fact
//! - [`WhyQuery::why_depth`] - the derivation followed back through premises

pub mod why;

pub use why::{CausalChain, CausalLink, WhyQuery, WhyResult};
