use std::sync::Arc;

use log::{debug, info};

use crate::{FetchError, ItemHandler, PageFetcher, PageRequest, StdResult};

/// A paginator walking a user's collection page by page, strictly forward.
pub struct SequentialPaginator<T: Send + Sync + 'static> {
    fetcher: Arc<dyn PageFetcher<T>>,
    page_size: u16,
}

impl<T: Send + Sync + 'static> SequentialPaginator<T> {
    /// Creates a new `SequentialPaginator` instance with the given fetcher and page size.
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>, page_size: u16) -> Self {
        Self {
            fetcher,
            page_size,
        }
    }

    /// Fetches every item of the subject's collection and hands them over in server order.
    ///
    /// Each page is requested with the cursor of the last item of the previous one.
    /// Returns the number of items handled. Any fetch or handler failure aborts the
    /// walk; items of the pages already fetched have been handled by then.
    pub async fn fetch_all(
        &self,
        subject: &str,
        handler: &mut dyn ItemHandler<T>,
    ) -> StdResult<u32> {
        let mut request = PageRequest::new(subject, self.page_size, None);
        let mut total_fetched = 0;
        let mut total_pages = 0;

        loop {
            debug!("Processing request: {request}");
            let page = self.fetcher.fetch(&request).await?;
            total_pages += 1;
            if total_pages == 1 {
                info!("User {subject} has {} items", page.total_count());
            }
            for edge in page.edges() {
                handler.handle(edge.node())?;
                total_fetched += 1;
            }
            if !page.page_info().has_next_page {
                break;
            }

            let cursor = page.last_cursor().ok_or_else(|| {
                FetchError::MalformedResponse(format!(
                    "page {total_pages} for {subject} announces a next page but has no item to continue from"
                ))
            })?;
            request = request.next(cursor);
        }
        info!("Fetched {total_fetched} items in {total_pages} pages for {subject}");

        Ok(total_fetched)
    }
}
