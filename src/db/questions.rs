use tracing::instrument;

use super::QuestionsDatabase;
use crate::error::{Result, StoreError};
use crate::model::{Question, QuestionFollow, QuestionLike, Reply, User};

impl Question {
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_id(db: &QuestionsDatabase, question_id: i64) -> Result<Question> {
        sqlx::query_as::<_, Question>(
            "SELECT id, title, body, author_id FROM questions WHERE id = ?",
        )
        .bind(question_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| StoreError::not_found("question", format!("id={question_id}")))
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_author_id(db: &QuestionsDatabase, author_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, title, body, author_id FROM questions WHERE author_id = ?",
        )
        .bind(author_id)
        .fetch_all(db.pool())
        .await?;
        Ok(questions)
    }

    pub async fn most_followed(db: &QuestionsDatabase, n: i64) -> Result<Vec<Question>> {
        QuestionFollow::most_followed_questions(db, n).await
    }

    pub async fn most_liked(db: &QuestionsDatabase, n: i64) -> Result<Vec<Question>> {
        QuestionLike::most_liked_questions(db, n).await
    }

    pub async fn author(&self, db: &QuestionsDatabase) -> Result<User> {
        User::find_by_id(db, self.author_id).await
    }

    pub async fn replies(&self, db: &QuestionsDatabase) -> Result<Vec<Reply>> {
        Reply::find_by_question_id(db, self.id).await
    }

    pub async fn followers(&self, db: &QuestionsDatabase) -> Result<Vec<User>> {
        QuestionFollow::followers_for_question_id(db, self.id).await
    }

    pub async fn likers(&self, db: &QuestionsDatabase) -> Result<Vec<User>> {
        QuestionLike::likers_for_question_id(db, self.id).await
    }

    pub async fn num_likes(&self, db: &QuestionsDatabase) -> Result<i64> {
        QuestionLike::num_likes_for_question_id(db, self.id).await
    }
}
