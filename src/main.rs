use anyhow::Result;
use clap::{Parser, Subcommand};
use questions_db::{config, Question, QuestionsDatabase, Reply, User};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse the questions forum store")]
struct Args {
    /// Path to YAML config file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a user with their activity summary
    User { id: i64 },
    /// Show a question with its author, replies, followers and likers
    Question { id: i64 },
    /// Show a reply with its parent and direct children
    Thread { reply_id: i64 },
    /// List the most liked questions
    MostLiked { n: i64 },
    /// List the most followed questions
    MostFollowed { n: i64 },
}

#[derive(Debug, Serialize)]
struct UserView {
    user: User,
    questions: usize,
    replies: usize,
    average_karma: f64,
}

#[derive(Debug, Serialize)]
struct QuestionView {
    question: Question,
    author: User,
    likes: i64,
    replies: Vec<Reply>,
    followers: Vec<User>,
    likers: Vec<User>,
}

#[derive(Debug, Serialize)]
struct ThreadView {
    reply: Reply,
    parent: Option<Reply>,
    children: Vec<Reply>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut cfg = config::load(args.config.as_deref())?;
    cfg.apply_env();
    config::validate(&cfg)?;

    let db = QuestionsDatabase::from_config(&cfg.database).await?;
    let outcome = run(&db, args.command).await;
    db.close().await;
    let json = outcome?;
    println!("{json}");
    Ok(())
}

async fn run(db: &QuestionsDatabase, command: Command) -> Result<String> {
    let json = match command {
        Command::User { id } => {
            let user = User::find_by_id(db, id).await?;
            let view = UserView {
                questions: user.authored_questions(db).await?.len(),
                replies: user.authored_replies(db).await?.len(),
                average_karma: user.average_karma(db).await?,
                user,
            };
            serde_json::to_string_pretty(&view)?
        }
        Command::Question { id } => {
            let question = Question::find_by_id(db, id).await?;
            let view = QuestionView {
                author: question.author(db).await?,
                likes: question.num_likes(db).await?,
                replies: question.replies(db).await?,
                followers: question.followers(db).await?,
                likers: question.likers(db).await?,
                question,
            };
            serde_json::to_string_pretty(&view)?
        }
        Command::Thread { reply_id } => {
            let reply = Reply::find_by_id(db, reply_id).await?;
            let view = ThreadView {
                parent: reply.parent_reply(db).await?,
                children: reply.child_replies(db).await?,
                reply,
            };
            serde_json::to_string_pretty(&view)?
        }
        Command::MostLiked { n } => {
            let questions = Question::most_liked(db, n).await?;
            info!(count = questions.len(), "most liked questions");
            serde_json::to_string_pretty(&questions)?
        }
        Command::MostFollowed { n } => {
            let questions = Question::most_followed(db, n).await?;
            info!(count = questions.len(), "most followed questions");
            serde_json::to_string_pretty(&questions)?
        }
    };
    Ok(json)
}
