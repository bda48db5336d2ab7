use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which column a task lives in. Doubles as the drop-target identity for
/// drag gestures, so an invalid bucket cannot be expressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub const ALL: [Self; 2] = [Self::Pending, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    /// The opposite column.
    pub fn other(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    /// Column index on the board: Pending is always the left column.
    pub fn column_index(self) -> usize {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Completed => 1,
        }
    }

    pub fn from_column_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TaskStatus::Pending),
            1 => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub content: String,
    pub status: TaskStatus,
    /// Milliseconds since the unix epoch, assigned once at creation.
    pub created_at: i64,
}

impl Task {
    pub fn new(content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            status: TaskStatus::Pending,
            created_at,
        }
    }
}

/// How the column views are ordered. Process-wide UI state, never persisted;
/// every run starts in Manual.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SortMode {
    #[default]
    Manual,
    ByDateDesc,
    Alphabetical,
}

impl SortMode {
    pub const ALL: [Self; 3] = [Self::Manual, Self::ByDateDesc, Self::Alphabetical];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Manual => "manual",
            SortMode::ByDateDesc => "date",
            SortMode::Alphabetical => "alpha",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Manual => "Manual",
            SortMode::ByDateDesc => "Newest first",
            SortMode::Alphabetical => "A-Z",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            SortMode::Manual => SortMode::ByDateDesc,
            SortMode::ByDateDesc => SortMode::Alphabetical,
            SortMode::Alphabetical => SortMode::Manual,
        }
    }
}

impl FromStr for SortMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "date" | "newest" => Ok(Self::ByDateDesc),
            "alpha" | "az" | "a-z" => Ok(Self::Alphabetical),
            _ => Err(()),
        }
    }
}
