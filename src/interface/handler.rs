use crate::StdResult;

/// A trait for consuming the items of a collection as they are fetched.
#[cfg_attr(test, mockall::automock)]
pub trait ItemHandler<T: 'static> {
    /// Handles one item.
    fn handle(&mut self, item: &T) -> StdResult<()>;

    /// Called once all the items of a subject have been handled.
    fn finish(&mut self) -> StdResult<()> {
        Ok(())
    }
}
