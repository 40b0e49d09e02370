use std::fmt;

/// Positional key of one checklist item: `w<week>-t<task>`.
///
/// Identifies a (week, task) slot, not the task text, so it stays stable for
/// as long as the roadmap is not replaced. Indices are not range-checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(week_index: i64, task_index: i64) -> Self {
        Self(format!("w{week_index}-t{task_index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
