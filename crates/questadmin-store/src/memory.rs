// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use questadmin_app::{InsertPosition, ManagedRecord, RecordId};
use std::sync::Arc;

/// Data-access boundary for one record collection. Every mutation replaces
/// the collection wholesale; snapshots handed out earlier never change.
pub trait RecordStore<R: ManagedRecord> {
    fn snapshot(&self) -> Arc<Vec<R>>;
    fn insert(&mut self, record: R, position: InsertPosition) -> Result<()>;
    fn replace(&mut self, record: R) -> Result<()>;
    /// Returns whether a record was removed. Missing ids are not an error.
    fn remove(&mut self, id: &RecordId) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct MemoryStore<R> {
    records: Arc<Vec<R>>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            records: Arc::new(Vec::new()),
        }
    }
}

impl<R: ManagedRecord> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<R>) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            if records[..index].iter().any(|other| other.id() == record.id()) {
                bail!(
                    "duplicate {} id {} in initial records",
                    R::KIND.as_str(),
                    record.id()
                );
            }
        }
        Ok(Self {
            records: Arc::new(records),
        })
    }
}

impl<R: ManagedRecord> RecordStore<R> for MemoryStore<R> {
    fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.records)
    }

    fn insert(&mut self, record: R, position: InsertPosition) -> Result<()> {
        if self.records.iter().any(|other| other.id() == record.id()) {
            bail!("{} {} already exists", R::KIND.as_str(), record.id());
        }
        let mut next = Vec::with_capacity(self.records.len() + 1);
        match position {
            InsertPosition::Front => {
                next.push(record);
                next.extend(self.records.iter().cloned());
            }
            InsertPosition::Back => {
                next.extend(self.records.iter().cloned());
                next.push(record);
            }
        }
        self.records = Arc::new(next);
        Ok(())
    }

    fn replace(&mut self, record: R) -> Result<()> {
        let Some(index) = self
            .records
            .iter()
            .position(|other| other.id() == record.id())
        else {
            bail!(
                "{} {} not found -- reload the list and retry",
                R::KIND.as_str(),
                record.id()
            );
        };
        let mut next = self.records.as_ref().clone();
        next[index] = record;
        self.records = Arc::new(next);
        Ok(())
    }

    fn remove(&mut self, id: &RecordId) -> Result<bool> {
        if !self.records.iter().any(|record| record.id() == id) {
            return Ok(false);
        }
        let next = self
            .records
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        self.records = Arc::new(next);
        Ok(true)
    }
}
