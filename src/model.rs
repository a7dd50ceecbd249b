//! Typed row records, one per forum table.
//!
//! Records are plain data decoded at the query boundary. Related rows are held
//! by id only and resolved through the finders in `crate::db`.
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub fname: String,
    pub lname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
}

/// A reply to a question, optionally threaded under another reply of the
/// same question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reply {
    pub id: i64,
    pub question_id: i64,
    pub parent_reply_id: Option<i64>,
    pub author_id: i64,
    pub body: String,
}

/// Join row: `user_id` follows `question_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuestionFollow {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
}

/// Join row: `user_id` likes `question_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuestionLike {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
}
