//! Command line tools listing the repositories and gists of GitHub users.
//!
//! Collections are walked page by page with the GraphQL cursor pagination of
//! the GitHub API, see [SequentialPaginator].

mod cli;
mod infrastructure;
mod interface;
mod model;

pub use cli::*;
pub use infrastructure::*;
pub use interface::*;
pub use model::*;
