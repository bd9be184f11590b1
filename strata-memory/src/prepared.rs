use crate::connection::State;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};
use strata_core::{Error, Prepared, Result, RowLabeled, Step, Value};

/// A statement handle over the shared connection state. Execution is
/// deferred to the first `step`, after all parameters are bound.
pub struct MemoryPrepared {
    state: Arc<Mutex<State>>,
    sql: String,
    params: Vec<Value>,
    executed: bool,
    rows: VecDeque<RowLabeled>,
}

impl MemoryPrepared {
    pub(crate) fn new(state: Arc<Mutex<State>>, sql: &str) -> Self {
        Self {
            state,
            sql: sql.to_owned(),
            params: Vec::new(),
            executed: false,
            rows: VecDeque::new(),
        }
    }
}

impl Prepared for MemoryPrepared {
    fn bind(&mut self, index: usize, value: &Value) -> Result<()> {
        if index == 0 {
            return Err(Error::driver(1, "bind indexes start at 1"));
        }
        if self.params.len() < index {
            self.params.resize(index, Value::Null);
        }
        self.params[index - 1] = value.clone();
        Ok(())
    }

    fn step(&mut self) -> Result<Step> {
        if !self.executed {
            self.executed = true;
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.rows = state.record(&self.sql, &self.params)?.into();
        }
        Ok(match self.rows.pop_front() {
            Some(row) => Step::Row(row),
            None => Step::Done,
        })
    }

    fn finalize(self) -> Result<()> {
        Ok(())
    }
}
