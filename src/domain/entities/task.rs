/// One entry of a user's to-do list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub task: String,
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub task: String,
}

impl NewTask {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}

impl crate::domain::traits::Resource for Task {
    type Fields = NewTask;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> i64 {
        self.user_id
    }
}
