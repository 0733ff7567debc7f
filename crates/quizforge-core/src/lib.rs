//! quizforge-core — Quiz model, answer evaluation, and session state.
//!
//! This crate defines the data model, the canonical scoring algorithm, the
//! theme palette table, and the collaborator traits that the rest of
//! quizforge builds on.

pub mod error;
pub mod evaluator;
pub mod exam;
pub mod library;
pub mod model;
pub mod parser;
pub mod settings;
pub mod store;
pub mod theme;
pub mod traits;
