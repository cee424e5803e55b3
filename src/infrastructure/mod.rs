mod fetcher_graphql;
mod handler_report;
mod paginator_sequential;

pub use fetcher_graphql::*;
pub use handler_report::*;
pub use paginator_sequential::*;
