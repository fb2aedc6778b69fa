//! Repository for the `profiles` table.

use sqlx::PgPool;

use crate::models::profile::{CreateProfile, Profile};

const COLUMNS: &str = "id, email, full_name, role, created_at, updated_at";

/// Provides CRUD operations for user profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a profile, or refresh name and role if the email already exists.
    pub async fn upsert(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (email, full_name, role) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO UPDATE SET \
                full_name = EXCLUDED.full_name, \
                role = EXCLUDED.role \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all profiles with the given role, ordered by email.
    pub async fn list_by_role(pool: &PgPool, role: &str) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE role = $1 ORDER BY email ASC");
        sqlx::query_as::<_, Profile>(&query)
            .bind(role)
            .fetch_all(pool)
            .await
    }
}
