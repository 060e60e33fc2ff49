use super::db::{read_datetime, Db};
use crate::libs::formatter::to_sql_datetime;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

pub const CATEGORY_NAME_MAX_LEN: usize = 100;

const INSERT_CATEGORY: &str = "INSERT INTO categories (user_id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_CATEGORY: &str = "UPDATE categories SET name = ?3, description = ?4 WHERE id = ?1 AND user_id = ?2";
const DELETE_CATEGORY: &str = "DELETE FROM categories WHERE id = ?1 AND user_id = ?2";
const SELECT_CATEGORIES: &str = "SELECT id, user_id, name, description, created_at FROM categories";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Category {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            created_at: read_datetime(row, 4)?,
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        msg_bail_anyhow!(Message::CategoryNameRequired);
    }
    if name.chars().count() > CATEGORY_NAME_MAX_LEN {
        msg_bail_anyhow!(Message::CategoryNameTooLong(CATEGORY_NAME_MAX_LEN));
    }
    Ok(())
}

/// Categories of a single owner. Every query is scoped by `user_id`.
pub struct Categories {
    conn: Connection,
}

impl Categories {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    pub fn create(&mut self, user_id: i64, name: &str, description: Option<&str>, now: DateTime<Utc>) -> Result<Category> {
        validate_name(name)?;
        self.conn
            .execute(INSERT_CATEGORY, params![user_id, name.trim(), description, to_sql_datetime(&now)])?;
        let id = self.conn.last_insert_rowid();
        self.get(user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::CategoryNotFound(id)))
    }

    pub fn get(&mut self, user_id: i64, id: i64) -> Result<Option<Category>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1 AND user_id = ?2", SELECT_CATEGORIES),
                params![id, user_id],
                Category::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Newest first.
    pub fn list(&mut self, user_id: i64) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE user_id = ?1 ORDER BY id DESC", SELECT_CATEGORIES))?;
        let categories = stmt.query_map(params![user_id], Category::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// `description: Some(None)` clears the description.
    pub fn update(&mut self, user_id: i64, id: i64, name: Option<&str>, description: Option<Option<&str>>) -> Result<Category> {
        let current = self.get(user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::CategoryNotFound(id)))?;

        let name = match name {
            Some(name) => {
                validate_name(name)?;
                name.trim().to_string()
            }
            None => current.name,
        };
        let description = match description {
            Some(description) => description.map(str::to_string),
            None => current.description,
        };

        self.conn.execute(UPDATE_CATEGORY, params![id, user_id, name, description])?;
        self.get(user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::CategoryNotFound(id)))
    }

    /// Deletes the category. Its tasks survive with their category cleared.
    pub fn delete(&mut self, user_id: i64, id: i64) -> Result<Category> {
        let current = self.get(user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::CategoryNotFound(id)))?;
        self.conn.execute(DELETE_CATEGORY, params![id, user_id])?;
        Ok(current)
    }
}
