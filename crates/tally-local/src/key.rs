use std::fmt;

/// The fixed set of keys Tally persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Active tasks, newest first.
    Tasks,
    /// Trashed tasks, most recently trashed first.
    TrashedTasks,
    /// The signed-in session blob.
    Session,
}

impl StorageKey {
    pub const ALL: &'static [Self] = &[Self::Tasks, Self::TrashedTasks, Self::Session];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::TrashedTasks => "trashed_tasks",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names() {
        let names: Vec<&str> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["tasks", "trashed_tasks", "session"]);
        assert_eq!(StorageKey::TrashedTasks.to_string(), "trashed_tasks");
    }
}
