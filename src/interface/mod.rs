mod fetcher;
mod handler;

pub use fetcher::*;
pub use handler::*;
