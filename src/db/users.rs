use super::db::{read_datetime, Db};
use crate::libs::formatter::to_sql_datetime;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

const INSERT_USER: &str = "INSERT INTO users (username, email, name, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_USERS: &str = "SELECT id, username, email, name, created_at FROM users";
const DELETE_USER: &str = "DELETE FROM users WHERE username = ?1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            name: row.get(3)?,
            created_at: read_datetime(row, 4)?,
        })
    }
}

/// Rough shape check only; the mail relay is the real authority.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') && !domain.contains('@'),
        None => false,
    }
}

pub struct Users {
    conn: Connection,
}

impl Users {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    pub fn create(&mut self, username: &str, email: &str, name: Option<&str>, now: DateTime<Utc>) -> Result<User> {
        let username = username.trim();
        let email = email.trim();
        if !is_valid_email(email) {
            msg_bail_anyhow!(Message::InvalidEmail(email.to_string()));
        }
        if self.get_by_username(username)?.is_some() {
            msg_bail_anyhow!(Message::UserAlreadyExists(username.to_string()));
        }

        self.conn
            .execute(INSERT_USER, params![username, email, name, to_sql_datetime(&now)])?;
        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)?
            .ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(username.to_string())))
    }

    pub fn get_by_username(&mut self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(&format!("{} WHERE username = ?1", SELECT_USERS), params![username], User::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<User>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_USERS), params![id], User::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn list(&mut self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY username", SELECT_USERS))?;
        let users = stmt.query_map([], User::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Removes the user together with their tasks and categories.
    pub fn delete(&mut self, username: &str) -> Result<()> {
        let affected = self.conn.execute(DELETE_USER, params![username])?;
        if affected == 0 {
            msg_bail_anyhow!(Message::UserNotFound(username.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("ana@@example.com"));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let mut users = Users::with_db(Db::open_in_memory().unwrap());
        users.create("ana", "ana@example.com", None, Utc::now()).unwrap();
        let err = users.create("ana", "other@example.com", None, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("ana"));
        assert_eq!(users.list().unwrap().len(), 1);
    }
}
