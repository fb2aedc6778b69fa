//! Repository for the `clients` table.

use agency_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, CreateClient};

const COLUMNS: &str = "id, name, company, email, created_by, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Find a client by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE name = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Return the client with `input.name`, creating it if it does not exist.
    pub async fn find_or_create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateClient,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, company, email, created_by) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.email)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }
}
