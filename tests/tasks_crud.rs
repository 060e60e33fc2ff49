#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::PathBuf;
    use taskbell::db::categories::Categories;
    use taskbell::db::db::Db;
    use taskbell::db::tasks::Tasks;
    use taskbell::db::users::Users;
    use taskbell::libs::task::{NewTask, Priority, TaskChanges, TaskOrder, TaskQuery};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TaskTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
        ana: i64,
        ben: i64,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("taskbell.db");
            let mut users = Users::with_db(Db::open(&db_path).unwrap());
            let ana = users.create("ana", "ana@example.com", None, day(1)).unwrap().id;
            let ben = users.create("ben", "ben@example.com", None, day(1)).unwrap().id;
            TaskTestContext {
                _temp_dir: temp_dir,
                db_path,
                ana,
                ben,
            }
        }
    }

    impl TaskTestContext {
        fn tasks(&self) -> Tasks {
            Tasks::with_db(Db::open(&self.db_path).unwrap())
        }

        fn categories(&self) -> Categories {
            Categories::with_db(Db::open(&self.db_path).unwrap())
        }
    }

    fn day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_insert_and_get(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let new = NewTask {
            description: "Bring the receipt".to_string(),
            due_date: Some(day(10)),
            priority: Priority::High,
            ..NewTask::new("  Return shoes  ")
        };

        let task = tasks.insert(ctx.ana, &new, day(1)).unwrap();

        assert_eq!(task.title, "Return shoes");
        assert_eq!(task.description, "Bring the receipt");
        assert_eq!(task.due_date, Some(day(10)));
        assert_eq!(task.priority, Priority::High);
        assert!(!task.is_completed);
        assert!(!task.is_reminded);
        assert_eq!(task.created_at, day(1));
        assert_eq!(task.updated_at, day(1));
        assert_eq!(tasks.get(ctx.ana, task.id).unwrap(), Some(task));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_invalid_title_is_rejected(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        assert!(tasks.insert(ctx.ana, &NewTask::new(""), day(1)).is_err());
        assert!(tasks.list(ctx.ana, &TaskQuery::default()).unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_tasks_are_scoped_to_their_owner(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let task = tasks.insert(ctx.ana, &NewTask::new("Private"), day(1)).unwrap();

        assert_eq!(tasks.get(ctx.ben, task.id).unwrap(), None);
        assert!(tasks.list(ctx.ben, &TaskQuery::default()).unwrap().is_empty());
        assert!(tasks.update(ctx.ben, task.id, &TaskChanges::default(), day(2)).is_err());
        assert!(tasks.set_completed(ctx.ben, task.id, true, day(2)).is_err());
        assert!(tasks.delete(ctx.ben, task.id).is_err());
        assert!(tasks.get(ctx.ana, task.id).unwrap().is_some());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_update_fields(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let task = tasks
            .insert(ctx.ana, &NewTask { due_date: Some(day(5)), ..NewTask::new("Draft") }, day(1))
            .unwrap();

        let changes = TaskChanges {
            title: Some("Final".to_string()),
            description: Some("Send to editor".to_string()),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        let updated = tasks.update(ctx.ana, task.id, &changes, day(2)).unwrap();

        assert_eq!(updated.title, "Final");
        assert_eq!(updated.description, "Send to editor");
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.due_date, Some(day(5)));
        assert_eq!(updated.created_at, day(1));
        assert_eq!(updated.updated_at, day(2));

        let cleared = TaskChanges {
            due_date: Some(None),
            ..Default::default()
        };
        assert_eq!(tasks.update(ctx.ana, task.id, &cleared, day(3)).unwrap().due_date, None);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_complete_and_reopen(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let task = tasks.insert(ctx.ana, &NewTask::new("Laundry"), day(1)).unwrap();

        assert!(tasks.set_completed(ctx.ana, task.id, true, day(2)).unwrap().is_completed);
        assert!(!tasks.set_completed(ctx.ana, task.id, false, day(3)).unwrap().is_completed);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_delete_returns_removed_task(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let task = tasks.insert(ctx.ana, &NewTask::new("Temporary"), day(1)).unwrap();

        let deleted = tasks.delete(ctx.ana, task.id).unwrap();

        assert_eq!(deleted.id, task.id);
        assert_eq!(tasks.get(ctx.ana, task.id).unwrap(), None);
        assert!(tasks.delete(ctx.ana, task.id).is_err());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_search_matches_title_and_description(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        tasks.insert(ctx.ana, &NewTask::new("Buy MILK"), day(1)).unwrap();
        tasks
            .insert(ctx.ana, &NewTask { description: "oat milk only".to_string(), ..NewTask::new("Groceries") }, day(2))
            .unwrap();
        tasks.insert(ctx.ana, &NewTask::new("100% done_ish"), day(3)).unwrap();
        tasks.insert(ctx.ana, &NewTask::new("Walk dog"), day(4)).unwrap();

        let search = |term: &str| {
            let query = TaskQuery {
                search: Some(term.to_string()),
                ..Default::default()
            };
            tasks.list(ctx.ana, &query).unwrap().into_iter().map(|t| t.title).collect::<Vec<_>>()
        };

        assert_eq!(search("milk"), vec!["Groceries", "Buy MILK"]);
        assert_eq!(search("%"), vec!["100% done_ish"]);
        assert_eq!(search("_"), vec!["100% done_ish"]);
        assert_eq!(search("   ").len(), 4);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_ordering_and_pending_filter(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let undated = tasks
            .insert(ctx.ana, &NewTask { priority: Priority::Low, ..NewTask::new("Undated") }, day(1))
            .unwrap();
        let late = tasks
            .insert(ctx.ana, &NewTask { due_date: Some(day(20)), ..NewTask::new("Late") }, day(2))
            .unwrap();
        let soon = tasks
            .insert(
                ctx.ana,
                &NewTask { due_date: Some(day(5)), priority: Priority::High, ..NewTask::new("Soon") },
                day(3),
            )
            .unwrap();
        tasks.set_completed(ctx.ana, late.id, true, day(4)).unwrap();

        let ids = |order: TaskOrder, pending_only: bool| {
            let query = TaskQuery {
                order,
                pending_only,
                ..Default::default()
            };
            tasks.list(ctx.ana, &query).unwrap().into_iter().map(|t| t.id).collect::<Vec<_>>()
        };

        assert_eq!(ids(TaskOrder::Newest, false), vec![soon.id, late.id, undated.id]);
        assert_eq!(ids(TaskOrder::Created, false), vec![undated.id, late.id, soon.id]);
        assert_eq!(ids(TaskOrder::Due, false), vec![soon.id, late.id, undated.id]);
        assert_eq!(ids(TaskOrder::Priority, false), vec![soon.id, late.id, undated.id]);
        assert_eq!(ids(TaskOrder::Due, true), vec![soon.id, undated.id]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_category_assignment_and_filter(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let mut categories = ctx.categories();
        let work = categories.create(ctx.ana, "Work", Some("Office things"), day(1)).unwrap();
        let foreign = categories.create(ctx.ben, "Ben's", None, day(1)).unwrap();

        let filed = tasks
            .insert(ctx.ana, &NewTask { category_id: Some(work.id), ..NewTask::new("Report") }, day(1))
            .unwrap();
        tasks.insert(ctx.ana, &NewTask::new("Loose"), day(2)).unwrap();

        assert_eq!(filed.category_name.as_deref(), Some("Work"));
        let query = TaskQuery {
            category_id: Some(work.id),
            ..Default::default()
        };
        let in_work = tasks.list(ctx.ana, &query).unwrap();
        assert_eq!(in_work.len(), 1);
        assert_eq!(in_work[0].id, filed.id);

        // Categories of another user are not assignable.
        let borrowed = NewTask {
            category_id: Some(foreign.id),
            ..NewTask::new("Sneaky")
        };
        assert!(tasks.insert(ctx.ana, &borrowed, day(3)).is_err());
        let moved = TaskChanges {
            category_id: Some(Some(foreign.id)),
            ..Default::default()
        };
        assert!(tasks.update(ctx.ana, filed.id, &moved, day(3)).is_err());

        let detached = TaskChanges {
            category_id: Some(None),
            ..Default::default()
        };
        let updated = tasks.update(ctx.ana, filed.id, &detached, day(4)).unwrap();
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.category_name, None);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_category_crud(ctx: &mut TaskTestContext) {
        let mut categories = ctx.categories();
        let home = categories.create(ctx.ana, "Home", None, day(1)).unwrap();
        let garden = categories.create(ctx.ana, "Garden", Some("Outside"), day(2)).unwrap();
        assert_eq!(home.created_at, day(1));
        assert_eq!(categories.get(ctx.ana, garden.id).unwrap().unwrap().created_at, day(2));

        let names: Vec<String> = categories.list(ctx.ana).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Garden", "Home"]);
        assert!(categories.list(ctx.ben).unwrap().is_empty());
        assert_eq!(categories.get(ctx.ben, home.id).unwrap(), None);

        let renamed = categories.update(ctx.ana, garden.id, Some("Yard"), Some(None)).unwrap();
        assert_eq!(renamed.name, "Yard");
        assert_eq!(renamed.description, None);
        assert!(categories.update(ctx.ana, garden.id, Some(" "), None).is_err());

        assert!(categories.delete(ctx.ben, home.id).is_err());
        assert_eq!(categories.delete(ctx.ana, home.id).unwrap().name, "Home");
        assert_eq!(categories.list(ctx.ana).unwrap().len(), 1);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_deleting_user_removes_their_data(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let mut categories = ctx.categories();
        let category = categories.create(ctx.ben, "Chores", None, day(1)).unwrap();
        let task = tasks
            .insert(ctx.ben, &NewTask { category_id: Some(category.id), ..NewTask::new("Dishes") }, day(1))
            .unwrap();

        let mut users = Users::with_db(Db::open(&ctx.db_path).unwrap());
        users.delete("ben").unwrap();

        assert_eq!(tasks.get_by_id(task.id).unwrap(), None);
        assert!(categories.list(ctx.ben).unwrap().is_empty());
        assert!(users.delete("ben").is_err());
        assert_eq!(users.list().unwrap().len(), 1);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_user_registration_rules(ctx: &mut TaskTestContext) {
        let mut users = Users::with_db(Db::open(&ctx.db_path).unwrap());

        assert!(users.create("ana", "other@example.com", None, day(2)).is_err());
        assert!(users.create("cy", "not-an-email", None, day(2)).is_err());

        let cy = users.create(" cy ", " cy@example.com ", Some("Cy"), day(2)).unwrap();
        assert_eq!(cy.username, "cy");
        assert_eq!(cy.email, "cy@example.com");
        assert_eq!(cy.created_at, day(2));
        assert_eq!(users.get_by_username("cy").unwrap(), Some(cy.clone()));
        assert_eq!(users.get_by_id(cy.id).unwrap(), Some(cy));

        let names: Vec<String> = users.list().unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["ana", "ben", "cy"]);
    }
}
