use std::fmt::Display;

/// A request for one page of a user's collection.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PageRequest {
    /// The login of the user whose collection is paged.
    pub(crate) subject: String,

    /// The number of items to return.
    pub(crate) first: u16,

    /// The cursor for pagination.
    pub(crate) after: Option<String>,
}

impl PageRequest {
    /// Creates a new `PageRequest` with the given subject, first, and after values.
    pub fn new(subject: &str, first: u16, after: Option<String>) -> Self {
        Self {
            subject: subject.to_string(),
            first,
            after,
        }
    }

    /// Creates the request for the page following the given cursor.
    pub fn next(&self, cursor: &str) -> Self {
        Self {
            subject: self.subject.clone(),
            first: self.first,
            after: Some(cursor.to_string()),
        }
    }

    /// Retrieves the subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Retrieves the page size.
    pub fn first(&self) -> u16 {
        self.first
    }

    /// Retrieves the cursor, if any.
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }
}

impl Display for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PageRequest: subject={}, first={}, after={:?}",
            self.subject, self.first, self.after
        )
    }
}
