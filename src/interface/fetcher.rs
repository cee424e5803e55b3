use crate::{FetchError, Page, PageRequest};

/// A trait for fetching one page of a user's collection from the API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PageFetcher<T: Send + Sync + 'static>: Sync + Send {
    /// Fetches the page described by the request.
    async fn fetch(&self, request: &PageRequest) -> Result<Page<T>, FetchError>;
}
