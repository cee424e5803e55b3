/// An item of a page along with its pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<T> {
    /// The cursor identifying the position of the item.
    pub(crate) cursor: String,

    /// The item itself.
    pub(crate) node: T,
}

impl<T> Edge<T> {
    /// Creates a new `Edge` instance.
    pub fn new(cursor: &str, node: T) -> Self {
        Self {
            cursor: cursor.to_string(),
            node,
        }
    }

    /// Retrieves the cursor.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Retrieves the item.
    pub fn node(&self) -> &T {
        &self.node
    }
}

/// Continuation metadata of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Whether more items exist after this page.
    pub has_next_page: bool,

    /// Whether items exist before this page.
    pub has_previous_page: bool,
}

/// A page of a user's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The size of the whole collection as reported by the server.
    pub(crate) total_count: u32,

    /// The items of the page, in server order.
    pub(crate) edges: Vec<Edge<T>>,

    /// The continuation metadata.
    pub(crate) page_info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a new `Page` instance.
    pub fn new(total_count: u32, edges: Vec<Edge<T>>, page_info: PageInfo) -> Self {
        Self {
            total_count,
            edges,
            page_info,
        }
    }

    /// Retrieves the total number of items of the collection.
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Retrieves the edges.
    pub fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    /// Retrieves the continuation metadata.
    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    /// Retrieves the cursor of the last item, if the page is not empty.
    pub fn last_cursor(&self) -> Option<&str> {
        self.edges.last().map(|edge| edge.cursor())
    }
}
