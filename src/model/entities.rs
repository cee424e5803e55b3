use chrono::{DateTime, SecondsFormat, Utc};

use super::ReportEntry;

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Metadata of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Whether the repository is private.
    pub is_private: bool,
    /// Whether the repository is a fork.
    pub is_fork: bool,
    /// The description of the repository.
    pub description: Option<String>,
    /// The HTTP URL of the repository.
    pub url: String,
    /// The disk usage in kilobytes, when visible to the viewer.
    pub disk_usage: Option<u64>,
    /// The number of forks.
    pub fork_count: u32,
    /// The number of stars.
    pub stargazer_count: u32,
    /// The number of watchers.
    pub watcher_count: u32,
    /// The creation time.
    pub created_at: DateTime<Utc>,
    /// The last update time.
    pub updated_at: DateTime<Utc>,
}

impl Repository {
    /// Creates a dummy `Repository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(url: &str) -> Self {
        Self {
            is_private: false,
            is_fork: false,
            description: Some("dummy".to_string()),
            url: url.to_string(),
            disk_usage: Some(42),
            fork_count: 1,
            stargazer_count: 10,
            watcher_count: 2,
            created_at: "2021-01-02T03:04:05Z".parse().unwrap(),
            updated_at: "2022-01-02T03:04:05Z".parse().unwrap(),
        }
    }
}

impl ReportEntry for Repository {
    const COLLECTION: &'static str = "repositories";

    fn report_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("private", self.is_private.to_string()),
            ("fork", self.is_fork.to_string()),
            ("description", self.description.clone().unwrap_or_default()),
            ("url", self.url.clone()),
            (
                "disk_usage",
                self.disk_usage
                    .map(|disk_usage| disk_usage.to_string())
                    .unwrap_or_default(),
            ),
            ("fork_count", self.fork_count.to_string()),
            ("stargazer_count", self.stargazer_count.to_string()),
            ("watcher_count", self.watcher_count.to_string()),
            ("created_at", format_timestamp(&self.created_at)),
            ("updated_at", format_timestamp(&self.updated_at)),
        ]
    }
}

/// Metadata of a GitHub gist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gist {
    /// Whether the gist is public.
    pub is_public: bool,
    /// Whether the gist is a fork.
    pub is_fork: bool,
    /// The description of the gist.
    pub description: Option<String>,
    /// The HTTP URL of the gist.
    pub url: String,
    /// The number of forks.
    pub fork_count: u32,
    /// The number of stars.
    pub stargazer_count: u32,
    /// The creation time.
    pub created_at: DateTime<Utc>,
    /// The last update time.
    pub updated_at: DateTime<Utc>,
}

impl ReportEntry for Gist {
    const COLLECTION: &'static str = "gists";

    fn report_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("public", self.is_public.to_string()),
            ("fork", self.is_fork.to_string()),
            ("description", self.description.clone().unwrap_or_default()),
            ("url", self.url.clone()),
            ("fork_count", self.fork_count.to_string()),
            ("stargazer_count", self.stargazer_count.to_string()),
            ("created_at", format_timestamp(&self.created_at)),
            ("updated_at", format_timestamp(&self.updated_at)),
        ]
    }
}
