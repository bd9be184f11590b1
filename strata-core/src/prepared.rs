use crate::{Result, RowLabeled, Value};

/// Cursor advance outcome.
#[derive(Debug)]
pub enum Step {
    Row(RowLabeled),
    Done,
}

/// A backend-prepared statement handle.
///
/// Parameters bind by 1-based position, matching the placeholder order of
/// a [`Rendered`](crate::Rendered) artifact. Dropping a handle releases it;
/// `finalize` exists to surface errors the backend reports on teardown.
pub trait Prepared {
    fn bind(&mut self, index: usize, value: &Value) -> Result<()>;
    fn step(&mut self) -> Result<Step>;
    fn finalize(self) -> Result<()>;
}
