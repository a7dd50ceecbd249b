use tracing::instrument;

use super::QuestionsDatabase;
use crate::error::{Result, StoreError};
use crate::model::{Question, QuestionFollow, User};

impl QuestionFollow {
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_id(db: &QuestionsDatabase, follow_id: i64) -> Result<QuestionFollow> {
        sqlx::query_as::<_, QuestionFollow>(
            "SELECT id, user_id, question_id FROM question_follows WHERE id = ?",
        )
        .bind(follow_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| StoreError::not_found("question follow", format!("id={follow_id}")))
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_user_id(db: &QuestionsDatabase, user_id: i64) -> Result<Vec<QuestionFollow>> {
        let follows = sqlx::query_as::<_, QuestionFollow>(
            "SELECT id, user_id, question_id FROM question_follows WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;
        Ok(follows)
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_question_id(
        db: &QuestionsDatabase,
        question_id: i64,
    ) -> Result<Vec<QuestionFollow>> {
        let follows = sqlx::query_as::<_, QuestionFollow>(
            "SELECT id, user_id, question_id FROM question_follows WHERE question_id = ?",
        )
        .bind(question_id)
        .fetch_all(db.pool())
        .await?;
        Ok(follows)
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn followers_for_question_id(
        db: &QuestionsDatabase,
        question_id: i64,
    ) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT users.id, users.fname, users.lname \
             FROM users \
             JOIN question_follows ON question_follows.user_id = users.id \
             WHERE question_follows.question_id = ?",
        )
        .bind(question_id)
        .fetch_all(db.pool())
        .await?;
        Ok(users)
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn followed_questions_for_user_id(
        db: &QuestionsDatabase,
        user_id: i64,
    ) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT questions.id, questions.title, questions.body, questions.author_id \
             FROM questions \
             JOIN question_follows ON question_follows.question_id = questions.id \
             WHERE question_follows.user_id = ?",
        )
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;
        Ok(questions)
    }

    /// Up to `n` questions with at least one follower, most followed first.
    /// Equal counts are ordered by question id.
    #[instrument(level = "debug", skip(db))]
    pub async fn most_followed_questions(db: &QuestionsDatabase, n: i64) -> Result<Vec<Question>> {
        if n <= 0 {
            return Ok(Vec::new());
        }
        let questions = sqlx::query_as::<_, Question>(
            "SELECT questions.id, questions.title, questions.body, questions.author_id \
             FROM questions \
             JOIN question_follows ON question_follows.question_id = questions.id \
             GROUP BY questions.id \
             ORDER BY COUNT(question_follows.id) DESC, questions.id ASC \
             LIMIT ?",
        )
        .bind(n)
        .fetch_all(db.pool())
        .await?;
        Ok(questions)
    }

    pub async fn user(&self, db: &QuestionsDatabase) -> Result<User> {
        User::find_by_id(db, self.user_id).await
    }

    pub async fn question(&self, db: &QuestionsDatabase) -> Result<Question> {
        Question::find_by_id(db, self.question_id).await
    }
}
