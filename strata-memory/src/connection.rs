use crate::{MemoryDriver, MemoryPrepared};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use strata_core::{Connection, Error, Result, Row, RowLabeled, RowNames, RowsAffected, Value};

#[derive(Default)]
pub(crate) struct State {
    committed: Vec<(String, Vec<Value>)>,
    /// `Some` while a transaction is open; the buffer moves into
    /// `committed` on commit and is discarded on rollback.
    pending: Option<Vec<(String, Vec<Value>)>>,
    scripted: VecDeque<Vec<RowLabeled>>,
    fail_when: Option<(String, i32, String)>,
    affected: RowsAffected,
    next_id: i64,
}

impl State {
    /// Execute one statement: fail if scripted to, log it, and hand back
    /// the rows the statement yields.
    pub(crate) fn record(&mut self, sql: &str, params: &[Value]) -> Result<Vec<RowLabeled>> {
        if let Some((needle, code, message)) = &self.fail_when {
            if sql.contains(needle.as_str()) {
                return Err(Error::Driver {
                    code: *code,
                    message: message.clone(),
                });
            }
        }
        log::trace!("memory driver: {}", sql);
        let entry = (sql.to_owned(), params.to_vec());
        match &mut self.pending {
            Some(buffer) => buffer.push(entry),
            None => self.committed.push(entry),
        }
        let rows = self.scripted.pop_front().unwrap_or_default();
        let last_affected_id = if sql.starts_with("INSERT") {
            self.next_id += 1;
            Some(self.next_id)
        } else {
            self.affected.last_affected_id
        };
        self.affected = RowsAffected {
            rows_affected: if rows.is_empty() { 1 } else { 0 },
            last_affected_id,
        };
        Ok(rows)
    }
}

/// A connection that never talks to a real engine: it records what would
/// have been executed. The contract between the core and a driver ends at
/// the `(sql, params)` artifact, so the log is the observable effect.
pub struct MemoryConnection {
    driver: MemoryDriver,
    state: Arc<Mutex<State>>,
}

fn lock(state: &Arc<Mutex<State>>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self {
            driver: MemoryDriver::new(),
            state: Arc::default(),
        }
    }

    /// Script the rows the next executed statement yields. Statements
    /// consume scripts in FIFO order; unscripted statements yield no rows.
    pub fn push_rows<S: AsRef<str>>(&mut self, labels: &[S], rows: Vec<Vec<Value>>) {
        let labels: RowNames = labels
            .iter()
            .map(|l| l.as_ref().to_owned())
            .collect::<Vec<_>>()
            .into();
        let rows = rows
            .into_iter()
            .map(|values| RowLabeled::new(labels.clone(), Row::from(values)))
            .collect();
        lock(&self.state).scripted.push_back(rows);
    }

    /// Make every statement whose SQL contains `needle` fail with a driver
    /// error until cleared.
    pub fn fail_when(&mut self, needle: impl Into<String>, code: i32, message: impl Into<String>) {
        lock(&self.state).fail_when = Some((needle.into(), code, message.into()));
    }

    pub fn clear_failure(&mut self) {
        lock(&self.state).fail_when = None;
    }

    /// Committed statements, transaction buffers excluded.
    pub fn committed(&self) -> Vec<(String, Vec<Value>)> {
        lock(&self.state).committed.clone()
    }

    pub fn committed_sql(&self) -> Vec<String> {
        lock(&self.state)
            .committed
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub(crate) fn state(&self) -> Arc<Mutex<State>> {
        self.state.clone()
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MemoryConnection {
    type Driver = MemoryDriver;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn prepare(&mut self, sql: &str) -> Result<MemoryPrepared> {
        Ok(MemoryPrepared::new(self.state(), sql))
    }

    fn begin(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if state.pending.is_some() {
            return Err(Error::driver(1, "transaction already open"));
        }
        state.pending = Some(Vec::new());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        let buffer = state
            .pending
            .take()
            .ok_or_else(|| Error::driver(1, "no open transaction"))?;
        state.committed.extend(buffer);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state
            .pending
            .take()
            .ok_or_else(|| Error::driver(1, "no open transaction"))?;
        Ok(())
    }

    fn rows_affected(&self) -> RowsAffected {
        lock(&self.state).affected
    }
}
