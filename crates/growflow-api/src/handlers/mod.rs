//! Handler modules for growflow-api.

pub mod extractions;
pub mod notes;
pub mod notifications;
pub mod profiles;
pub mod tasks;

pub use extractions::create_extraction;
pub use notes::{create_note, list_notes};
pub use notifications::{list_notifications, mark_all_notifications_read, mark_notification_read};
pub use profiles::list_profiles;
pub use tasks::{list_tasks, update_task_status};
