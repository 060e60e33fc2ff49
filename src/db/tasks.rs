use super::db::{read_datetime, read_optional_datetime, Db};
use crate::libs::formatter::{to_sql_datetime, truncate_to_seconds};
use crate::libs::messages::Message;
use crate::libs::reminder::store::{ReminderError, TaskStore};
use crate::libs::task::{NewTask, Priority, Task, TaskChanges, TaskOrder, TaskQuery};
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const SELECT_TASKS: &str = "SELECT t.id, t.user_id, t.title, t.description, t.due_date, t.is_completed, t.is_reminded,
        t.priority, t.category_id, c.name, t.created_at, t.updated_at
    FROM tasks t
    LEFT JOIN categories c ON c.id = t.category_id";
const INSERT_TASK: &str = "INSERT INTO tasks (user_id, title, description, due_date, priority, category_id, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)";
const UPDATE_TASK: &str = "UPDATE tasks
    SET title = ?3, description = ?4, due_date = ?5, priority = ?6, category_id = ?7, is_reminded = ?8, updated_at = ?9
    WHERE id = ?1 AND user_id = ?2";
const UPDATE_COMPLETED: &str = "UPDATE tasks SET is_completed = ?3, updated_at = ?4 WHERE id = ?1 AND user_id = ?2";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2";
const COUNT_OWNED_CATEGORY: &str = "SELECT COUNT(*) FROM categories WHERE id = ?1 AND user_id = ?2";
const WHERE_ELIGIBLE: &str = "WHERE t.is_completed = 0 AND t.is_reminded = 0 AND t.due_date IS NOT NULL AND t.due_date <= ?1";
const CLAIM_REMINDER: &str = "UPDATE tasks SET is_reminded = 1, updated_at = ?3
    WHERE id = ?1 AND due_date = ?2 AND is_reminded = 0 AND is_completed = 0";
const RELEASE_REMINDER: &str = "UPDATE tasks SET is_reminded = 0, updated_at = ?3
    WHERE id = ?1 AND due_date = ?2 AND is_reminded = 1";
const SELECT_OWNER_EMAIL: &str = "SELECT email FROM users WHERE id = ?1";

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get(7)?;
    let priority = priority
        .parse::<Priority>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        due_date: read_optional_datetime(row, 4)?,
        is_completed: row.get(5)?,
        is_reminded: row.get(6)?,
        priority,
        category_id: row.get(8)?,
        category_name: row.get(9)?,
        created_at: read_datetime(row, 10)?,
        updated_at: read_datetime(row, 11)?,
    })
}

fn fetch_owned(conn: &Connection, user_id: i64, id: i64) -> Result<Option<Task>> {
    conn.query_row(
        &format!("{} WHERE t.id = ?1 AND t.user_id = ?2", SELECT_TASKS),
        params![id, user_id],
        task_from_row,
    )
    .optional()
    .map_err(Into::into)
}

fn ensure_category_owned(conn: &Connection, user_id: i64, category_id: Option<i64>) -> Result<()> {
    if let Some(category_id) = category_id {
        let count: i64 = conn.query_row(COUNT_OWNED_CATEGORY, params![category_id, user_id], |row| row.get(0))?;
        if count == 0 {
            msg_bail_anyhow!(Message::CategoryNotFound(category_id));
        }
    }
    Ok(())
}

fn order_clause(order: TaskOrder) -> &'static str {
    match order {
        TaskOrder::Newest => "ORDER BY t.created_at DESC, t.id DESC",
        TaskOrder::Due => "ORDER BY t.due_date IS NULL, t.due_date ASC, t.id ASC",
        TaskOrder::Created => "ORDER BY t.created_at ASC, t.id ASC",
        TaskOrder::Priority => {
            "ORDER BY CASE t.priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END, t.created_at DESC, t.id DESC"
        }
    }
}

/// Task storage. The connection sits behind a mutex so one `Tasks` can be
/// shared between the CLI and the reminder scheduler.
pub struct Tasks {
    conn: Mutex<Connection>,
}

impl Tasks {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: Mutex::new(db.conn) }
    }

    pub fn insert(&self, user_id: i64, task: &NewTask, now: DateTime<Utc>) -> Result<Task> {
        task.validate()?;
        let conn = self.conn.lock();
        ensure_category_owned(&conn, user_id, task.category_id)?;

        conn.execute(
            INSERT_TASK,
            params![
                user_id,
                task.title.trim(),
                task.description,
                task.due_date.map(|due| to_sql_datetime(&due)),
                task.priority.as_str(),
                task.category_id,
                to_sql_datetime(&now),
            ],
        )?;
        let id = conn.last_insert_rowid();
        fetch_owned(&conn, user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(id)))
    }

    pub fn get(&self, user_id: i64, id: i64) -> Result<Option<Task>> {
        fetch_owned(&self.conn.lock(), user_id, id)
    }

    /// Lookup without owner scoping, for the reminder worker and tests.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.conn
            .lock()
            .query_row(&format!("{} WHERE t.id = ?1", SELECT_TASKS), params![id], task_from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn list(&self, user_id: i64, query: &TaskQuery) -> Result<Vec<Task>> {
        let mut sql = format!("{} WHERE t.user_id = ?", SELECT_TASKS);
        let mut values = vec![Value::Integer(user_id)];

        if query.pending_only {
            sql.push_str(" AND t.is_completed = 0");
        }
        if let Some(category_id) = query.category_id {
            sql.push_str(" AND t.category_id = ?");
            values.push(Value::Integer(category_id));
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let escaped = search.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
            let pattern = format!("%{}%", escaped);
            sql.push_str(" AND (t.title LIKE ? ESCAPE '\\' OR t.description LIKE ? ESCAPE '\\')");
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern));
        }
        sql.push(' ');
        sql.push_str(order_clause(query.order));

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params_from_iter(values.iter()), task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Applies `changes`. A due date that differs from the stored one re-arms
    /// the reminder.
    pub fn update(&self, user_id: i64, id: i64, changes: &TaskChanges, now: DateTime<Utc>) -> Result<Task> {
        changes.validate()?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let current = fetch_owned(&tx, user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(id)))?;
        if let Some(category_id) = changes.category_id {
            ensure_category_owned(&tx, user_id, category_id)?;
        }

        let title = changes.title.as_deref().map(str::trim).unwrap_or(&current.title);
        let description = changes.description.as_deref().unwrap_or(&current.description);
        let due_date = match changes.due_date {
            Some(due) => due.map(truncate_to_seconds),
            None => current.due_date,
        };
        let priority = changes.priority.unwrap_or(current.priority);
        let category_id = changes.category_id.unwrap_or(current.category_id);
        let is_reminded = if due_date != current.due_date { false } else { current.is_reminded };

        tx.execute(
            UPDATE_TASK,
            params![
                id,
                user_id,
                title,
                description,
                due_date.map(|due| to_sql_datetime(&due)),
                priority.as_str(),
                category_id,
                is_reminded,
                to_sql_datetime(&now),
            ],
        )?;
        let updated = fetch_owned(&tx, user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(id)))?;
        tx.commit()?;

        Ok(updated)
    }

    pub fn set_completed(&self, user_id: i64, id: i64, completed: bool, now: DateTime<Utc>) -> Result<Task> {
        let conn = self.conn.lock();
        let affected = conn.execute(UPDATE_COMPLETED, params![id, user_id, completed, to_sql_datetime(&now)])?;
        if affected == 0 {
            msg_bail_anyhow!(Message::TaskNotFound(id));
        }
        fetch_owned(&conn, user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(id)))
    }

    /// Deletes the task and hands back what was removed.
    pub fn delete(&self, user_id: i64, id: i64) -> Result<Task> {
        let conn = self.conn.lock();
        let current = fetch_owned(&conn, user_id, id)?.ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(id)))?;
        conn.execute(DELETE_TASK, params![id, user_id])?;
        Ok(current)
    }
}

impl TaskStore for Tasks {
    fn find_eligible(&self, now: DateTime<Utc>, task_id: Option<i64>) -> Result<Vec<Task>, ReminderError> {
        let now = to_sql_datetime(&now);
        let conn = self.conn.lock();

        let tasks = match task_id {
            Some(id) => {
                let mut stmt = conn.prepare(&format!("{} {} AND t.id = ?2", SELECT_TASKS, WHERE_ELIGIBLE))?;
                let rows = stmt.query_map(params![now, id], task_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!("{} {} ORDER BY t.due_date, t.id", SELECT_TASKS, WHERE_ELIGIBLE))?;
                let rows = stmt.query_map(params![now], task_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(tasks)
    }

    fn compare_and_set_reminded(&self, task_id: i64, due_date: &DateTime<Utc>, now: DateTime<Utc>) -> Result<bool, ReminderError> {
        let affected = self
            .conn
            .lock()
            .execute(CLAIM_REMINDER, params![task_id, to_sql_datetime(due_date), to_sql_datetime(&now)])?;
        Ok(affected == 1)
    }

    fn release_reminded(&self, task_id: i64, due_date: &DateTime<Utc>, now: DateTime<Utc>) -> Result<bool, ReminderError> {
        let affected = self
            .conn
            .lock()
            .execute(RELEASE_REMINDER, params![task_id, to_sql_datetime(due_date), to_sql_datetime(&now)])?;
        Ok(affected == 1)
    }

    fn recipient_for(&self, task: &Task) -> Result<String, ReminderError> {
        let email: Option<String> = self
            .conn
            .lock()
            .query_row(SELECT_OWNER_EMAIL, params![task.user_id], |row| row.get(0))
            .optional()?;
        email.filter(|e| !e.is_empty()).ok_or(ReminderError::OwnerMissing(task.id))
    }
}
