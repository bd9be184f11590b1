use strata_core::SqlWriter;

/// The memory backend speaks the generic dialect unmodified.
#[derive(Default)]
pub struct MemorySqlWriter;

impl SqlWriter for MemorySqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
