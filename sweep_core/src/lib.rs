//! `sweep_core` is the core library for the sweep source rewriter. It holds a
//! lossless token buffer, a scope-aware engine that rules use to query and
//! rewrite it, a parse gate that rejects malformed input and an orchestrator
//! that drives rules until the buffer stops changing.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source text
//!   -> Lexer (lossless tokens, scopes paired, operator fixity inferred)
//!   -> Validator (rejects error tokens and merge conflict markers, runs once)
//!   -> Orchestrator (passes of every rule in order until a pass changes nothing)
//!   -> Source text
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `sweep.toml` loading and the [`Options`] rules read.
//! - [`lexer`]: the reference tokenizer. Any lexer that produces [`Token`]s
//!   works with the rest of the crate.
//! - [`rules`]: the [`Rule`] trait, the ordered [`RuleRegistry`] and the
//!   built-in rules.
//!
//! ## Key Types
//!
//! - [`Token`]: one lexical unit with its exact source text.
//! - [`Engine`]: the mutable buffer plus same-scope and explicit-range search.
//! - [`SweepError`]: parsing, non-termination and configuration failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use sweep_core::Options;
//! use sweep_core::RuleRegistry;
//! use sweep_core::format_source;
//!
//! let source = "store.scope(state: { $0.child }, action: { .child($0) })\n";
//! let formatted = format_source(source, &RuleRegistry::default(), &Options::default()).unwrap();
//!
//! assert_eq!(formatted, "store.scope(state: \\.child, action: \\.child)\n");
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use lexer::tokenize;
pub use orchestrator::*;
pub use position::*;
pub use rules::FnRule;
pub use rules::Rule;
pub use rules::RuleRegistry;
pub use tokens::*;
pub use validator::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod lexer;
mod orchestrator;
mod position;
pub mod rules;
mod tokens;
mod validator;

#[cfg(test)]
mod __fixtures;
