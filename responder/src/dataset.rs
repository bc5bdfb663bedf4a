use std::sync::Arc;

pub const MOCK_USERS: [&str; 6] = [
    "John Doe",
    "Jane Smith",
    "Robert Johnson",
    "Emily Davis",
    "Michael Brown",
    "Sarah Wilson",
];

/// Read-only list of user names, shared by every in-flight request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset(Arc<[String]>);

impl Dataset {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dataset(names.into_iter().map(Into::into).collect())
    }

    pub fn mock() -> Self {
        Self::new(MOCK_USERS)
    }

    pub fn all(&self) -> Vec<String> {
        self.0.to_vec()
    }

    /// Looks up a user by 1-based id. Ids outside the list yield `None`.
    pub fn get(&self, user_id: i64) -> Option<&str> {
        let index = usize::try_from(user_id.checked_sub(1)?).ok()?;
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::mock()
    }
}
