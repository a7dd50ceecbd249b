use tracing::instrument;

use super::QuestionsDatabase;
use crate::error::{Result, StoreError};
use crate::model::{Question, Reply, User};

impl Reply {
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_id(db: &QuestionsDatabase, reply_id: i64) -> Result<Reply> {
        sqlx::query_as::<_, Reply>(
            "SELECT id, question_id, parent_reply_id, author_id, body FROM replies WHERE id = ?",
        )
        .bind(reply_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| StoreError::not_found("reply", format!("id={reply_id}")))
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_question_id(db: &QuestionsDatabase, question_id: i64) -> Result<Vec<Reply>> {
        let replies = sqlx::query_as::<_, Reply>(
            "SELECT id, question_id, parent_reply_id, author_id, body FROM replies WHERE question_id = ?",
        )
        .bind(question_id)
        .fetch_all(db.pool())
        .await?;
        Ok(replies)
    }

    /// Replies written by `user_id`.
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_user_id(db: &QuestionsDatabase, user_id: i64) -> Result<Vec<Reply>> {
        let replies = sqlx::query_as::<_, Reply>(
            "SELECT id, question_id, parent_reply_id, author_id, body FROM replies WHERE author_id = ?",
        )
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;
        Ok(replies)
    }

    /// Direct children of `parent_id`; grandchildren are not included.
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_parent_id(db: &QuestionsDatabase, parent_id: i64) -> Result<Vec<Reply>> {
        let replies = sqlx::query_as::<_, Reply>(
            "SELECT id, question_id, parent_reply_id, author_id, body FROM replies WHERE parent_reply_id = ?",
        )
        .bind(parent_id)
        .fetch_all(db.pool())
        .await?;
        Ok(replies)
    }

    pub async fn author(&self, db: &QuestionsDatabase) -> Result<User> {
        User::find_by_id(db, self.author_id).await
    }

    pub async fn question(&self, db: &QuestionsDatabase) -> Result<Question> {
        Question::find_by_id(db, self.question_id).await
    }

    /// `None` for a top-level reply. A parent id pointing at a missing row
    /// is reported as not found.
    pub async fn parent_reply(&self, db: &QuestionsDatabase) -> Result<Option<Reply>> {
        match self.parent_reply_id {
            Some(parent_id) => Reply::find_by_id(db, parent_id).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn child_replies(&self, db: &QuestionsDatabase) -> Result<Vec<Reply>> {
        Reply::find_by_parent_id(db, self.id).await
    }
}
