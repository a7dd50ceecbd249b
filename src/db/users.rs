use tracing::instrument;

use super::QuestionsDatabase;
use crate::error::{Result, StoreError};
use crate::model::{Question, QuestionFollow, QuestionLike, Reply, User};

impl User {
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_id(db: &QuestionsDatabase, user_id: i64) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT id, fname, lname FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| StoreError::not_found("user", format!("id={user_id}")))
    }

    /// First user with exactly this first and last name.
    #[instrument(level = "debug", skip(db))]
    pub async fn find_by_name(db: &QuestionsDatabase, fname: &str, lname: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, fname, lname FROM users WHERE fname = ? AND lname = ? ORDER BY id LIMIT 1",
        )
        .bind(fname)
        .bind(lname)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| StoreError::not_found("user", format!("name={fname} {lname}")))
    }

    pub async fn authored_questions(&self, db: &QuestionsDatabase) -> Result<Vec<Question>> {
        Question::find_by_author_id(db, self.id).await
    }

    pub async fn authored_replies(&self, db: &QuestionsDatabase) -> Result<Vec<Reply>> {
        Reply::find_by_user_id(db, self.id).await
    }

    pub async fn followed_questions(&self, db: &QuestionsDatabase) -> Result<Vec<Question>> {
        QuestionFollow::followed_questions_for_user_id(db, self.id).await
    }

    pub async fn liked_questions(&self, db: &QuestionsDatabase) -> Result<Vec<Question>> {
        QuestionLike::liked_questions_for_user_id(db, self.id).await
    }

    /// Likes received across this user's questions divided by the number of
    /// questions they authored. Zero when they authored none.
    #[instrument(level = "debug", skip_all, fields(user_id = self.id))]
    pub async fn average_karma(&self, db: &QuestionsDatabase) -> Result<f64> {
        let karma: Option<f64> = sqlx::query_scalar(
            "SELECT CAST(COUNT(question_likes.id) AS REAL) / COUNT(DISTINCT questions.id) \
             FROM questions \
             LEFT OUTER JOIN question_likes ON question_likes.question_id = questions.id \
             WHERE questions.author_id = ?",
        )
        .bind(self.id)
        .fetch_one(db.pool())
        .await?;
        Ok(karma.unwrap_or(0.0))
    }
}
