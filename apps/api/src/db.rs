use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Bootstraps the schema with idempotent DDL.
/// Assessments and roadmaps are one-per-user (UNIQUE user_id) and cascade-delete
/// with their owner.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            role TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessments (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            main_goal TEXT NOT NULL,
            age_bracket TEXT NOT NULL,
            current_situation TEXT NOT NULL,
            biggest_challenge TEXT NOT NULL,
            learning_pace TEXT NOT NULL,
            skill_level SMALLINT NOT NULL,
            career_path TEXT NOT NULL,
            other_career_path TEXT,
            target_timeframe TEXT NOT NULL,
            learning_style TEXT NOT NULL,
            previous_courses TEXT NOT NULL,
            certifications TEXT,
            motivation TEXT,
            hear_about TEXT NOT NULL,
            recommended_job_titles TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS roadmaps (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            assessment_id UUID NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            roadmap JSONB NOT NULL,
            total_duration_months INTEGER NOT NULL,
            difficulty_level TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Schema bootstrap complete");
    Ok(())
}
