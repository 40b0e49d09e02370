pub mod handlers;
pub mod task_id;
pub mod tracker;
