use crate::db::categories::Category;
use crate::libs::task::{Priority, Task};
use chrono::{DateTime, Duration, Utc};

const UPCOMING_WINDOW_DAYS: i64 = 7;
const TOP_CATEGORIES: usize = 5;
const RECENT_TASKS: usize = 5;

/// Per-user overview shown by `taskbell stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub categories: usize,
    /// Open tasks whose due date has passed.
    pub overdue: usize,
    /// Open tasks due within the next seven days.
    pub upcoming: usize,
    /// Open task count per priority, highest first.
    pub open_by_priority: Vec<(Priority, usize)>,
    /// Categories with the most open tasks.
    pub top_categories: Vec<(String, usize)>,
    pub recent: Vec<Task>,
}

impl Dashboard {
    /// `tasks` must belong to one user; order does not matter.
    pub fn from_parts(tasks: &[Task], categories: &[Category], now: DateTime<Utc>) -> Self {
        let open: Vec<&Task> = tasks.iter().filter(|t| !t.is_completed).collect();
        let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);

        let overdue = open.iter().filter(|t| t.due_date.is_some_and(|due| due < now)).count();
        let upcoming = open
            .iter()
            .filter(|t| t.due_date.is_some_and(|due| due > now && due <= horizon))
            .count();

        let open_by_priority = Priority::ALL
            .iter()
            .map(|p| (*p, open.iter().filter(|t| t.priority == *p).count()))
            .collect();

        let mut top_categories: Vec<(String, usize)> = categories
            .iter()
            .map(|c| (c.name.clone(), open.iter().filter(|t| t.category_id == Some(c.id)).count()))
            .collect();
        top_categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_categories.truncate(TOP_CATEGORIES);

        let mut recent = tasks.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        recent.truncate(RECENT_TASKS);

        Dashboard {
            total: tasks.len(),
            completed: tasks.len() - open.len(),
            pending: open.len(),
            categories: categories.len(),
            overdue,
            upcoming,
            open_by_priority,
            top_categories,
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: i64, due: Option<DateTime<Utc>>, completed: bool, priority: Priority, category_id: Option<i64>) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(id);
        Task {
            id,
            user_id: 1,
            title: format!("Task {}", id),
            description: String::new(),
            due_date: due,
            is_completed: completed,
            is_reminded: false,
            priority,
            category_id,
            category_name: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            user_id: 1,
            name: name.to_string(),
            description: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn counts_open_work() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let tasks = vec![
            task(1, Some(now - Duration::days(1)), false, Priority::High, Some(1)),
            task(2, Some(now - Duration::days(1)), true, Priority::High, Some(1)),
            task(3, Some(now + Duration::days(3)), false, Priority::Low, Some(2)),
            task(4, Some(now + Duration::days(30)), false, Priority::Medium, Some(2)),
            task(5, None, false, Priority::Medium, None),
            task(6, None, false, Priority::Medium, Some(2)),
        ];
        let categories = vec![category(1, "Home"), category(2, "Work"), category(3, "Empty")];

        let dashboard = Dashboard::from_parts(&tasks, &categories, now);

        assert_eq!(dashboard.total, 6);
        assert_eq!(dashboard.completed, 1);
        assert_eq!(dashboard.pending, 5);
        assert_eq!(dashboard.categories, 3);
        assert_eq!(dashboard.overdue, 1);
        assert_eq!(dashboard.upcoming, 1);
        assert_eq!(
            dashboard.open_by_priority,
            vec![(Priority::High, 1), (Priority::Medium, 3), (Priority::Low, 1)]
        );
        assert_eq!(
            dashboard.top_categories,
            vec![("Work".to_string(), 3), ("Home".to_string(), 1), ("Empty".to_string(), 0)]
        );
        assert_eq!(dashboard.recent.iter().map(|t| t.id).collect::<Vec<_>>(), vec![6, 5, 4, 3, 2]);
    }

    #[test]
    fn task_due_right_now_is_neither_overdue_nor_upcoming() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let tasks = vec![
            task(1, Some(now), false, Priority::Medium, None),
            task(2, Some(now + Duration::seconds(1)), false, Priority::Medium, None),
            task(3, Some(now + Duration::days(UPCOMING_WINDOW_DAYS)), false, Priority::Medium, None),
        ];

        let dashboard = Dashboard::from_parts(&tasks, &[], now);

        assert_eq!(dashboard.overdue, 0);
        assert_eq!(dashboard.upcoming, 2);
    }
}
