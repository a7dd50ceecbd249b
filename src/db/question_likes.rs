use tracing::instrument;

use super::QuestionsDatabase;
use crate::error::{Result, StoreError};
use crate::model::{Question, QuestionLike, User};

impl QuestionLike {
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_id(db: &QuestionsDatabase, like_id: i64) -> Result<QuestionLike> {
        sqlx::query_as::<_, QuestionLike>(
            "SELECT id, user_id, question_id FROM question_likes WHERE id = ?",
        )
        .bind(like_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| StoreError::not_found("question like", format!("id={like_id}")))
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_user_id(db: &QuestionsDatabase, user_id: i64) -> Result<Vec<QuestionLike>> {
        let likes = sqlx::query_as::<_, QuestionLike>(
            "SELECT id, user_id, question_id FROM question_likes WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;
        Ok(likes)
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_question_id(
        db: &QuestionsDatabase,
        question_id: i64,
    ) -> Result<Vec<QuestionLike>> {
        let likes = sqlx::query_as::<_, QuestionLike>(
            "SELECT id, user_id, question_id FROM question_likes WHERE question_id = ?",
        )
        .bind(question_id)
        .fetch_all(db.pool())
        .await?;
        Ok(likes)
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn likers_for_question_id(db: &QuestionsDatabase, question_id: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT users.id, users.fname, users.lname \
             FROM users \
             JOIN question_likes ON question_likes.user_id = users.id \
             WHERE question_likes.question_id = ?",
        )
        .bind(question_id)
        .fetch_all(db.pool())
        .await?;
        Ok(users)
    }

    /// Number of like rows for the question; 0 when there are none.
    #[instrument(level = "debug", skip(db))]
    pub async fn num_likes_for_question_id(db: &QuestionsDatabase, question_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM question_likes WHERE question_id = ?")
                .bind(question_id)
                .fetch_one(db.pool())
                .await?;
        Ok(count)
    }

    #[instrument(level = "debug", skip(db))]
    pub async fn liked_questions_for_user_id(
        db: &QuestionsDatabase,
        user_id: i64,
    ) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT questions.id, questions.title, questions.body, questions.author_id \
             FROM questions \
             JOIN question_likes ON question_likes.question_id = questions.id \
             WHERE question_likes.user_id = ?",
        )
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;
        Ok(questions)
    }

    /// Up to `n` questions with at least one like, most liked first.
    /// Equal counts are ordered by question id.
    #[instrument(level = "debug", skip(db))]
    pub async fn most_liked_questions(db: &QuestionsDatabase, n: i64) -> Result<Vec<Question>> {
        if n <= 0 {
            return Ok(Vec::new());
        }
        let questions = sqlx::query_as::<_, Question>(
            "SELECT questions.id, questions.title, questions.body, questions.author_id \
             FROM questions \
             JOIN question_likes ON question_likes.question_id = questions.id \
             GROUP BY questions.id \
             ORDER BY COUNT(question_likes.id) DESC, questions.id ASC \
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
