//! Read-only access layer over the questions forum store.
//!
//! Open a [`QuestionsDatabase`] and pass it to the finders on the records in
//! [`model`]. Every call runs one parameterized statement; nothing is cached.

pub mod config;
pub mod db;
pub mod error;
pub mod model;

pub use db::QuestionsDatabase;
pub use error::{Result, StoreError};
pub use model::{Question, QuestionFollow, QuestionLike, Reply, User};
