use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct LostAndFoundStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LostAndFoundItem {
    pub id: i64,
    pub item_name: String,
    pub description: String,
    pub date_found: String,
    pub location_found: String,
    pub status: i64,
    pub submitter_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewLostAndFoundItem<'a> {
    pub item_name: &'a str,
    pub description: &'a str,
    pub date_found: &'a str,
    pub location_found: &'a str,
    pub status: i64,
    pub submitter_id: i64,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct LostAndFoundPatch<'a> {
    pub item_name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub date_found: Option<&'a str>,
    pub location_found: Option<&'a str>,
    pub status: Option<i64>,
}

impl LostAndFoundStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all items, oldest first.
    pub async fn list(&self) -> Result<Vec<LostAndFoundItem>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, item_name, description, date_found, location_found, status, submitter_id FROM lost_and_found ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<LostAndFoundItem>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, item_name, description, date_found, location_found, status, submitter_id FROM lost_and_found WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create an item. Returns the item ID.
    pub async fn create(&self, item: &NewLostAndFoundItem<'_>) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO lost_and_found (item_name, description, date_found, location_found, status, submitter_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(item.item_name)
        .bind(item.description)
        .bind(item.date_found)
        .bind(item.location_found)
        .bind(item.status)
        .bind(item.submitter_id)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Apply a partial update. Returns false if the item does not exist.
    pub async fn update(&self, id: i64, patch: &LostAndFoundPatch<'_>) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lost_and_found SET
                item_name = COALESCE(?, item_name),
                description = COALESCE(?, description),
                date_found = COALESCE(?, date_found),
                location_found = COALESCE(?, location_found),
                status = COALESCE(?, status)
             WHERE id = ?",
        )
        .bind(patch.item_name)
        .bind(patch.description)
        .bind(patch.date_found)
        .bind(patch.location_found)
        .bind(patch.status)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lost_and_found WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
