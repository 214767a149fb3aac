//! Task materialization: turning extracted tasks into persisted rows.
//!
//! The materializer sits between extraction and storage. It resolves
//! free-text assignee names against the profile directory, inserts task
//! rows one at a time, and emits assignment notifications. A batch never
//! aborts on a single task's failure; failed tasks are collected as
//! [`TaskError`]s while the rest of the batch proceeds in input order.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use growflow_core::{
    CreateNotificationRequest, CreateTaskRequest, ExtractedTask, MaterializeOutcome,
    NotificationKind, NotificationRepository, ProfileRepository, Task, TaskError, TaskRepository,
    TaskStatus,
};

/// Persists extracted tasks and emits their notification side effects.
pub struct TaskMaterializer {
    tasks: Arc<dyn TaskRepository>,
    profiles: Arc<dyn ProfileRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl TaskMaterializer {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        profiles: Arc<dyn ProfileRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            tasks,
            profiles,
            notifications,
        }
    }

    /// Materialize a batch of extracted tasks for the submitting user.
    ///
    /// Tasks are processed strictly in input order. Each task resolves
    /// its assignee, is inserted, and (when assigned to someone other
    /// than the submitter) produces an `assigned` notification. Insert
    /// failures are recorded per task and do not roll back earlier
    /// inserts; notification failures are logged and never fail the
    /// task.
    #[instrument(skip(self, extracted), fields(
        subsystem = "database",
        component = "materializer",
        op = "materialize",
        task_count = extracted.len(),
    ))]
    pub async fn materialize(
        &self,
        submitter_id: Uuid,
        note_id: Option<Uuid>,
        extracted: Vec<ExtractedTask>,
    ) -> MaterializeOutcome {
        let start = Instant::now();
        let mut outcome = MaterializeOutcome::default();

        for task in extracted {
            let assignee_id = self
                .resolve_assignee(submitter_id, task.assignee_name.as_deref())
                .await;

            let req = CreateTaskRequest {
                note_id,
                user_id: submitter_id,
                assignee_id: Some(assignee_id),
                description: task.description.clone(),
                status: task.status,
                priority: task.priority,
                deadline: task.deadline,
            };

            match self.tasks.insert(req).await {
                Ok(created) => {
                    debug!(task_id = %created.id, "Created task");
                    if assignee_id != submitter_id {
                        self.notify_assigned(&created, submitter_id).await;
                    }
                    outcome.created.push(created);
                }
                Err(e) => {
                    warn!(error_msg = %e, "Task insertion failed");
                    outcome.errors.push(TaskError {
                        task: task.description,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            created = outcome.created.len(),
            failed = outcome.errors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Materialization complete"
        );
        outcome
    }

    /// Resolve a free-text assignee name to a profile id, defaulting to
    /// the submitter when the name is absent, unmatched, or the lookup
    /// fails.
    async fn resolve_assignee(&self, submitter_id: Uuid, name: Option<&str>) -> Uuid {
        let Some(name) = name else {
            return submitter_id;
        };

        match self.profiles.find_by_name(name).await {
            Ok(Some(profile)) => {
                debug!(
                    assignee_name = name,
                    profile_id = %profile.id,
                    "Matched assignee to profile"
                );
                profile.id
            }
            Ok(None) => {
                debug!(assignee_name = name, "No profile found for assignee");
                submitter_id
            }
            Err(e) => {
                warn!(assignee_name = name, error_msg = %e, "Assignee lookup failed");
                submitter_id
            }
        }
    }

    async fn notify_assigned(&self, task: &Task, actor_id: Uuid) {
        let Some(recipient_id) = task.assignee_id else {
            return;
        };

        let req = CreateNotificationRequest {
            recipient_id,
            actor_id,
            kind: NotificationKind::Assigned,
            task_id: Some(task.id),
            message: format!("You've been assigned: {}", task.description),
        };

        match self.notifications.insert(req).await {
            Ok(_) => debug!(recipient_id = %recipient_id, "Notification created for assignee"),
            Err(e) => warn!(error_msg = %e, "Notification insertion failed"),
        }
    }
}

/// Notify a task's creator that someone else completed it.
///
/// Applies only when the task's status is Done and the completer is not
/// the creator; all other transitions and self-completions are silent.
/// Insert failures are logged and swallowed.
pub async fn notify_task_completed(
    notifications: &dyn NotificationRepository,
    task: &Task,
    completer_id: Uuid,
) {
    if task.status != TaskStatus::Done || task.user_id == completer_id {
        return;
    }

    let req = CreateNotificationRequest {
        recipient_id: task.user_id,
        actor_id: completer_id,
        kind: NotificationKind::Completed,
        task_id: Some(task.id),
        message: format!("Task completed: {}", task.description),
    };

    match notifications.insert(req).await {
        Ok(_) => debug!(recipient_id = %task.user_id, "Notification created for task creator"),
        Err(e) => warn!(error_msg = %e, "Notification insertion failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use growflow_core::{Error, ListTasksRequest, Notification, Priority, Profile, Result};
    use std::collections::HashSet;
    use std::sync::Mutex;

    // =========================================================================
    // IN-MEMORY REPOSITORY FAKES
    // =========================================================================

    #[derive(Default)]
    struct FakeTaskRepo {
        inserted: Mutex<Vec<Task>>,
        fail_descriptions: HashSet<String>,
    }

    impl FakeTaskRepo {
        fn failing_on(descriptions: &[&str]) -> Self {
            Self {
                inserted: Mutex::new(Vec::new()),
                fail_descriptions: descriptions.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn inserted(&self) -> Vec<Task> {
            self.inserted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskRepository for FakeTaskRepo {
        async fn insert(&self, req: CreateTaskRequest) -> Result<Task> {
            if self.fail_descriptions.contains(&req.description) {
                return Err(Error::Internal("simulated insert failure".to_string()));
            }
            let now = Utc::now();
            let task = Task {
                id: growflow_core::new_v7(),
                note_id: req.note_id,
                user_id: req.user_id,
                assignee_id: req.assignee_id,
                description: req.description,
                status: req.status,
                priority: req.priority,
                deadline: req.deadline,
                created_at_utc: now,
                updated_at_utc: now,
            };
            self.inserted.lock().unwrap().push(task.clone());
            Ok(task)
        }

        async fn get(&self, id: Uuid) -> Result<Option<Task>> {
            Ok(self
                .inserted
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == id)
                .cloned())
        }

        async fn list(&self, _req: ListTasksRequest) -> Result<Vec<Task>> {
            Ok(self.inserted())
        }

        async fn update_status(&self, id: Uuid, _status: TaskStatus) -> Result<Task> {
            Err(Error::TaskNotFound(id))
        }
    }

    #[derive(Default)]
    struct FakeProfileRepo {
        profiles: Vec<Profile>,
        fail_lookups: bool,
    }

    impl FakeProfileRepo {
        fn with_profiles(names: &[(&str, Uuid)]) -> Self {
            let now = Utc::now();
            Self {
                profiles: names
                    .iter()
                    .map(|(name, id)| Profile {
                        id: *id,
                        email: format!("{}@example.com", name.to_lowercase()),
                        full_name: Some(name.to_string()),
                        avatar_url: None,
                        created_at_utc: now,
                        updated_at_utc: now,
                    })
                    .collect(),
                fail_lookups: false,
            }
        }
    }

    #[async_trait]
    impl ProfileRepository for FakeProfileRepo {
        async fn find_by_name(&self, name: &str) -> Result<Option<Profile>> {
            if self.fail_lookups {
                return Err(Error::Internal("simulated lookup failure".to_string()));
            }
            let needle = name.to_lowercase();
            Ok(self
                .profiles
                .iter()
                .find(|p| {
                    p.full_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
                })
                .cloned())
        }

        async fn list(&self, _search: Option<&str>) -> Result<Vec<Profile>> {
            Ok(self.profiles.clone())
        }
    }

    #[derive(Default)]
    struct FakeNotificationRepo {
        inserted: Mutex<Vec<CreateNotificationRequest>>,
        fail_inserts: bool,
    }

    impl FakeNotificationRepo {
        fn failing() -> Self {
            Self {
                inserted: Mutex::new(Vec::new()),
                fail_inserts: true,
            }
        }

        fn inserted(&self) -> Vec<CreateNotificationRequest> {
            self.inserted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationRepository for FakeNotificationRepo {
        async fn insert(&self, req: CreateNotificationRequest) -> Result<Uuid> {
            if self.fail_inserts {
                return Err(Error::Internal("simulated notification failure".to_string()));
            }
            self.inserted.lock().unwrap().push(req);
            Ok(growflow_core::new_v7())
        }

        async fn list_for_recipient(
            &self,
            _recipient_id: Uuid,
            _unread_only: bool,
        ) -> Result<Vec<Notification>> {
            Ok(Vec::new())
        }

        async fn mark_read(&self, _id: Uuid) -> Result<()> {
            Ok(())
        }

        async fn mark_all_read(&self, _recipient_id: Uuid) -> Result<u64> {
            Ok(0)
        }
    }

    fn materializer(
        tasks: Arc<FakeTaskRepo>,
        profiles: Arc<FakeProfileRepo>,
        notifications: Arc<FakeNotificationRepo>,
    ) -> TaskMaterializer {
        TaskMaterializer::new(tasks, profiles, notifications)
    }

    fn extracted(description: &str, assignee: Option<&str>) -> ExtractedTask {
        ExtractedTask {
            description: description.to_string(),
            assignee_name: assignee.map(str::to_string),
            priority: Priority::Medium,
            status: TaskStatus::NotStarted,
            deadline: None,
        }
    }

    // =========================================================================
    // MATERIALIZATION
    // =========================================================================

    #[tokio::test]
    async fn creates_tasks_in_input_order() {
        let tasks = Arc::new(FakeTaskRepo::default());
        let m = materializer(
            tasks.clone(),
            Arc::new(FakeProfileRepo::default()),
            Arc::new(FakeNotificationRepo::default()),
        );
        let submitter = Uuid::new_v4();

        let outcome = m
            .materialize(
                submitter,
                None,
                vec![
                    extracted("First task", None),
                    extracted("Second task", None),
                    extracted("Third task", None),
                ],
            )
            .await;

        assert_eq!(outcome.created.len(), 3);
        assert!(outcome.errors.is_empty());
        let descriptions: Vec<_> = tasks
            .inserted()
            .iter()
            .map(|t| t.description.clone())
            .collect();
        assert_eq!(descriptions, vec!["First task", "Second task", "Third task"]);
    }

    #[tokio::test]
    async fn unassigned_task_defaults_to_submitter() {
        let tasks = Arc::new(FakeTaskRepo::default());
        let m = materializer(
            tasks.clone(),
            Arc::new(FakeProfileRepo::default()),
            Arc::new(FakeNotificationRepo::default()),
        );
        let submitter = Uuid::new_v4();

        let outcome = m
            .materialize(submitter, None, vec![extracted("Solo task", None)])
            .await;

        assert_eq!(outcome.created[0].assignee_id, Some(submitter));
    }

    #[tokio::test]
    async fn resolves_assignee_by_partial_name() {
        let sarah = Uuid::new_v4();
        let profiles = Arc::new(FakeProfileRepo::with_profiles(&[("Sarah Connor", sarah)]));
        let notifications = Arc::new(FakeNotificationRepo::default());
        let m = materializer(
            Arc::new(FakeTaskRepo::default()),
            profiles,
            notifications.clone(),
        );
        let submitter = Uuid::new_v4();

        let outcome = m
            .materialize(
                submitter,
                None,
                vec![extracted("Review budget", Some("Sarah"))],
            )
            .await;

        assert_eq!(outcome.created[0].assignee_id, Some(sarah));
        let sent = notifications.inserted();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_id, sarah);
        assert_eq!(sent[0].actor_id, submitter);
        assert_eq!(sent[0].kind, NotificationKind::Assigned);
        assert_eq!(sent[0].message, "You've been assigned: Review budget");
        assert_eq!(sent[0].task_id, Some(outcome.created[0].id));
    }

    #[tokio::test]
    async fn unmatched_assignee_falls_back_to_submitter_without_notification() {
        let notifications = Arc::new(FakeNotificationRepo::default());
        let m = materializer(
            Arc::new(FakeTaskRepo::default()),
            Arc::new(FakeProfileRepo::default()),
            notifications.clone(),
        );
        let submitter = Uuid::new_v4();

        let outcome = m
            .materialize(
                submitter,
                None,
                vec![extracted("Call vendor", Some("Nobody Known"))],
            )
            .await;

        assert_eq!(outcome.created[0].assignee_id, Some(submitter));
        assert!(notifications.inserted().is_empty());
    }

    #[tokio::test]
    async fn self_assignment_emits_no_notification() {
        let submitter = Uuid::new_v4();
        let profiles = Arc::new(FakeProfileRepo::with_profiles(&[("Alice Smith", submitter)]));
        let notifications = Arc::new(FakeNotificationRepo::default());
        let m = materializer(
            Arc::new(FakeTaskRepo::default()),
            profiles,
            notifications.clone(),
        );

        let outcome = m
            .materialize(
                submitter,
                None,
                vec![extracted("Write report", Some("Alice"))],
            )
            .await;

        assert_eq!(outcome.created[0].assignee_id, Some(submitter));
        assert!(notifications.inserted().is_empty());
    }

    #[tokio::test]
    async fn failed_lookup_falls_back_to_submitter() {
        let profiles = Arc::new(FakeProfileRepo {
            profiles: Vec::new(),
            fail_lookups: true,
        });
        let m = materializer(
            Arc::new(FakeTaskRepo::default()),
            profiles,
            Arc::new(FakeNotificationRepo::default()),
        );
        let submitter = Uuid::new_v4();

        let outcome = m
            .materialize(
                submitter,
                None,
                vec![extracted("Ship release", Some("Sarah"))],
            )
            .await;

        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].assignee_id, Some(submitter));
    }

    #[tokio::test]
    async fn insert_failure_is_isolated_per_task() {
        let tasks = Arc::new(FakeTaskRepo::failing_on(&["Second task"]));
        let m = materializer(
            tasks.clone(),
            Arc::new(FakeProfileRepo::default()),
            Arc::new(FakeNotificationRepo::default()),
        );
        let submitter = Uuid::new_v4();

        let outcome = m
            .materialize(
                submitter,
                None,
                vec![
                    extracted("First task", None),
                    extracted("Second task", None),
                    extracted("Third task", None),
                ],
            )
            .await;

        assert_eq!(outcome.created.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].task, "Second task");
        assert!(outcome.errors[0].error.contains("simulated insert failure"));
        assert_eq!(outcome.created[0].description, "First task");
        assert_eq!(outcome.created[1].description, "Third task");
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_task() {
        let sarah = Uuid::new_v4();
        let profiles = Arc::new(FakeProfileRepo::with_profiles(&[("Sarah Connor", sarah)]));
        let m = materializer(
            Arc::new(FakeTaskRepo::default()),
            profiles,
            Arc::new(FakeNotificationRepo::failing()),
        );

        let outcome = m
            .materialize(
                Uuid::new_v4(),
                None,
                vec![extracted("Review budget", Some("Sarah"))],
            )
            .await;

        assert_eq!(outcome.created.len(), 1);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn note_id_is_stamped_on_created_tasks() {
        let tasks = Arc::new(FakeTaskRepo::default());
        let m = materializer(
            tasks.clone(),
            Arc::new(FakeProfileRepo::default()),
            Arc::new(FakeNotificationRepo::default()),
        );
        let note_id = Uuid::new_v4();

        let outcome = m
            .materialize(
                Uuid::new_v4(),
                Some(note_id),
                vec![extracted("Linked task", None)],
            )
            .await;

        assert_eq!(outcome.created[0].note_id, Some(note_id));
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_outcome() {
        let m = materializer(
            Arc::new(FakeTaskRepo::default()),
            Arc::new(FakeProfileRepo::default()),
            Arc::new(FakeNotificationRepo::default()),
        );

        let outcome = m.materialize(Uuid::new_v4(), None, Vec::new()).await;

        assert!(outcome.created.is_empty());
        assert!(outcome.errors.is_empty());
    }

    // =========================================================================
    // COMPLETION NOTIFICATIONS
    // =========================================================================

    fn done_task(creator: Uuid) -> Task {
        let now = Utc::now();
        Task {
            id: growflow_core::new_v7(),
            note_id: None,
            user_id: creator,
            assignee_id: None,
            description: "Review budget".to_string(),
            status: TaskStatus::Done,
            priority: Priority::Medium,
            deadline: None,
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    #[tokio::test]
    async fn completion_by_other_notifies_creator() {
        let notifications = FakeNotificationRepo::default();
        let creator = Uuid::new_v4();
        let completer = Uuid::new_v4();

        notify_task_completed(&notifications, &done_task(creator), completer).await;

        let sent = notifications.inserted();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_id, creator);
        assert_eq!(sent[0].actor_id, completer);
        assert_eq!(sent[0].kind, NotificationKind::Completed);
        assert_eq!(sent[0].message, "Task completed: Review budget");
    }

    #[tokio::test]
    async fn self_completion_is_silent() {
        let notifications = FakeNotificationRepo::default();
        let creator = Uuid::new_v4();

        notify_task_completed(&notifications, &done_task(creator), creator).await;

        assert!(notifications.inserted().is_empty());
    }

    #[tokio::test]
    async fn non_done_transition_is_silent() {
        let notifications = FakeNotificationRepo::default();
        let creator = Uuid::new_v4();
        let mut task = done_task(creator);
        task.status = TaskStatus::InProgress;

        notify_task_completed(&notifications, &task, Uuid::new_v4()).await;

        assert!(notifications.inserted().is_empty());
    }

    #[tokio::test]
    async fn completion_notification_failure_is_swallowed() {
        let notifications = FakeNotificationRepo::failing();
        let creator = Uuid::new_v4();

        // Must not panic or propagate
        notify_task_completed(&notifications, &done_task(creator), Uuid::new_v4()).await;

        assert!(notifications.inserted().is_empty());
    }
}
