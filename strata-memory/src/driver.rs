use crate::{MemoryConnection, MemoryPrepared, MemorySqlWriter};
use strata_core::Driver;

#[derive(Clone, Copy, Default)]
pub struct MemoryDriver;

impl MemoryDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MemoryDriver {
    type Connection = MemoryConnection;
    type Prepared = MemoryPrepared;
    type SqlWriter = MemorySqlWriter;

    const NAME: &'static str = "memory";

    fn sql_writer(&self) -> Self::SqlWriter {
        MemorySqlWriter::default()
    }
}
