// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use questadmin_app::{
    ConfirmState, DraftPayload, FilterSet, FormPayload, FormState, ListState, ManagedRecord,
    Paged, RecordId, RecordKind, TablePage, TableRow, ValidationError, paginate,
};
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use time::Date;
use tracing::{debug, info};

use crate::memory::{MemoryStore, RecordStore};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft was rejected; nothing was committed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Hands out `<prefix>_<n>` ids, skipping any already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    prefix: &'static str,
    next: u64,
}

impl IdAllocator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Starts past the highest `<prefix>_<n>` already in `existing`.
    pub fn resume<R: ManagedRecord>(prefix: &'static str, existing: &[R]) -> Self {
        let next = existing
            .iter()
            .filter_map(|record| {
                record
                    .id()
                    .as_str()
                    .strip_prefix(prefix)?
                    .strip_prefix('_')?
                    .parse::<u64>()
                    .ok()
            })
            .max()
            .map_or(1, |highest| highest.saturating_add(1));
        Self { prefix, next }
    }

    fn candidate<R: ManagedRecord>(&self, existing: &[R]) -> (RecordId, u64) {
        let mut sequence = self.next;
        loop {
            let id = RecordId::sequenced(self.prefix, sequence);
            if !existing.iter().any(|record| *record.id() == id) {
                return (id, sequence);
            }
            sequence += 1;
        }
    }

    fn claim(&mut self, sequence: u64) {
        self.next = self.next.max(sequence + 1);
    }
}

/// Generic list/filter/paginate/edit manager for one record kind.
#[derive(Debug, Clone)]
pub struct RecordManager<R: ManagedRecord, S: RecordStore<R> = MemoryStore<R>> {
    store: S,
    ids: IdAllocator,
    page_size: usize,
    list_state: ListState<R::Filter>,
    _record: PhantomData<fn() -> R>,
}

impl<R: ManagedRecord> RecordManager<R> {
    pub fn in_memory(records: Vec<R>) -> Result<Self> {
        let store = MemoryStore::with_records(records)
            .with_context(|| format!("load {} records", R::KIND.as_str()))?;
        Ok(Self::new(store))
    }
}

impl<R: ManagedRecord, S: RecordStore<R>> RecordManager<R, S> {
    pub fn new(store: S) -> Self {
        let ids = IdAllocator::resume(R::KIND.id_prefix(), store.snapshot().as_slice());
        Self {
            store,
            ids,
            page_size: R::PAGE_SIZE,
            list_state: ListState::default(),
            _record: PhantomData,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.list_state.goto_page(1);
    }

    pub fn snapshot(&self) -> Arc<Vec<R>> {
        self.store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.store.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &RecordId) -> Option<R> {
        self.store
            .snapshot()
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Keyword and filters in collection order, then the requested page.
    /// Out-of-range pages are clamped.
    pub fn list(&self, keyword: &str, filter: &R::Filter, page: usize) -> Paged<R> {
        let snapshot = self.store.snapshot();
        let matching: Vec<R> = snapshot
            .iter()
            .filter(|record| record.matches(keyword, filter))
            .cloned()
            .collect();
        paginate(&matching, self.page_size, page)
    }

    pub fn list_state(&self) -> &ListState<R::Filter> {
        &self.list_state
    }

    pub fn list_state_mut(&mut self) -> &mut ListState<R::Filter> {
        &mut self.list_state
    }

    /// Lists with the held search state and stores back the clamped page.
    pub fn current_page(&mut self) -> Paged<R> {
        let paged = self.list(
            &self.list_state.keyword,
            &self.list_state.filter,
            self.list_state.page,
        );
        self.list_state.page = paged.window.page;
        paged
    }

    pub fn open_create_form(&self, today: Date) -> FormState<R::Draft> {
        FormState::create(R::blank_draft(today))
    }

    pub fn open_edit_form(&self, record: &R) -> FormState<R::Draft> {
        FormState::edit(record.id().clone(), record.to_draft())
    }

    pub fn submit(&mut self, form: &FormState<R::Draft>) -> Result<R, SubmitError> {
        let kind = R::KIND.as_str();
        match form.editing() {
            Some(id) => {
                let record = R::from_draft(id.clone(), &form.draft)?;
                self.store.replace(record.clone())?;
                info!(kind, id = %record.id(), "record updated");
                Ok(record)
            }
            None => {
                let (id, sequence) = self.ids.candidate(self.store.snapshot().as_slice());
                let record = R::from_draft(id, &form.draft)?;
                self.store.insert(record.clone(), R::INSERT_AT)?;
                self.ids.claim(sequence);
                info!(kind, id = %record.id(), "record created");
                Ok(record)
            }
        }
    }

    /// Replaces a record directly, skipping draft validation.
    pub fn update(&mut self, record: R) -> Result<()> {
        self.store.replace(record)
    }

    pub fn open_delete_confirm(&self, record: &R) -> ConfirmState {
        ConfirmState {
            id: record.id().clone(),
            label: record.label(),
        }
    }

    /// Removes the confirmed record. A record that is already gone is a
    /// no-op.
    pub fn confirm_delete(&mut self, confirm: &ConfirmState) -> Result<bool> {
        let removed = self.store.remove(&confirm.id)?;
        if removed {
            info!(kind = R::KIND.as_str(), id = %confirm.id, "record deleted");
        } else {
            debug!(kind = R::KIND.as_str(), id = %confirm.id, "delete skipped, record already gone");
        }
        Ok(removed)
    }

    pub fn table_page(&mut self) -> TablePage {
        let paged = self.current_page();
        TablePage {
            kind: R::KIND,
            columns: R::COLUMNS.to_vec(),
            rows: paged
                .items
                .iter()
                .map(|record| TableRow {
                    id: record.id().clone(),
                    cells: record.cells(),
                })
                .collect(),
            window: paged.window,
            keyword: self.list_state.keyword.clone(),
            filters: self.list_state.filter.slots(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Export<'a, T> {
            kind: &'static str,
            count: usize,
            records: &'a [T],
        }

        let snapshot = self.store.snapshot();
        serde_json::to_string_pretty(&Export {
            kind: R::KIND.as_str(),
            count: snapshot.len(),
            records: snapshot.as_slice(),
        })
        .with_context(|| format!("serialize {} records", R::KIND.as_str()))
    }
}

/// Kind-erased access to one manager, used by the front end.
pub trait RecordPage {
    fn kind(&self) -> RecordKind;
    fn len(&self) -> usize;
    fn table_page(&mut self) -> TablePage;
    fn set_keyword(&mut self, keyword: &str);
    fn cycle_filter(&mut self, slot: usize);
    fn goto_page(&mut self, page: usize);
    fn blank_form(&self, today: Date) -> FormState<FormPayload>;
    fn edit_form(&self, id: &RecordId) -> Option<FormState<FormPayload>>;
    fn submit_payload(&mut self, form: FormState<FormPayload>) -> Result<RecordId, SubmitError>;
    fn delete_confirm(&self, id: &RecordId) -> Option<ConfirmState>;
    fn confirm_delete(&mut self, confirm: &ConfirmState) -> Result<bool>;
    fn export_json(&self) -> Result<String>;
}

impl<R: ManagedRecord, S: RecordStore<R>> RecordPage for RecordManager<R, S> {
    fn kind(&self) -> RecordKind {
        R::KIND
    }

    fn len(&self) -> usize {
        RecordManager::len(self)
    }

    fn table_page(&mut self) -> TablePage {
        RecordManager::table_page(self)
    }

    fn set_keyword(&mut self, keyword: &str) {
        self.list_state.set_keyword(keyword);
    }

    fn cycle_filter(&mut self, slot: usize) {
        self.list_state.cycle_filter(slot);
    }

    fn goto_page(&mut self, page: usize) {
        self.list_state.goto_page(page);
    }

    fn blank_form(&self, today: Date) -> FormState<FormPayload> {
        self.open_create_form(today).map(DraftPayload::into_payload)
    }

    fn edit_form(&self, id: &RecordId) -> Option<FormState<FormPayload>> {
        let record = self.find(id)?;
        Some(self.open_edit_form(&record).map(DraftPayload::into_payload))
    }

    fn submit_payload(&mut self, form: FormState<FormPayload>) -> Result<RecordId, SubmitError> {
        let payload_kind = form.draft.kind();
        let FormState { mode, draft } = form;
        let draft = <R::Draft as DraftPayload>::from_payload(draft).ok_or_else(|| {
            anyhow!(
                "{} form submitted to the {} list",
                payload_kind.as_str(),
                R::KIND.as_str()
            )
        })?;
        let record = self.submit(&FormState { mode, draft })?;
        Ok(record.id().clone())
    }

    fn delete_confirm(&self, id: &RecordId) -> Option<ConfirmState> {
        self.find(id)
            .map(|record| self.open_delete_confirm(&record))
    }

    fn confirm_delete(&mut self, confirm: &ConfirmState) -> Result<bool> {
        RecordManager::confirm_delete(self, confirm)
    }

    fn export_json(&self) -> Result<String> {
        RecordManager::export_json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{IdAllocator, RecordManager, RecordPage, SubmitError};
    use anyhow::Result;
    use questadmin_app::{
        FormFields, FormPayload, FormState, InsertPosition, ManagedRecord, Package, RecordId,
        RecordKind, User, ValidationError,
    };
    use time::{Date, Month};

    fn today() -> Date {
        Date::from_calendar_date(2026, Month::March, 2).expect("valid date")
    }

    #[test]
    fn allocator_skips_taken_ids() -> Result<()> {
        let mut manager = RecordManager::<User>::in_memory(Vec::new())?;
        let mut form = manager.open_create_form(today());
        form.draft.full_name = "A".to_owned();
        form.draft.email = "a@x".to_owned();
        let first = manager.submit(&form)?;
        assert_eq!(first.id.as_str(), "u_1");

        let allocator = IdAllocator::new("u");
        let (id, sequence) = allocator.candidate(manager.snapshot().as_slice());
        assert_eq!((id.as_str(), sequence), ("u_2", 2));
        Ok(())
    }

    #[test]
    fn rebuilt_manager_never_reuses_a_deleted_id() -> Result<()> {
        let mut manager = RecordManager::<User>::in_memory(Vec::new())?;
        let mut form = manager.open_create_form(today());
        form.draft.full_name = "A".to_owned();
        form.draft.email = "a@x".to_owned();
        let first = manager.submit(&form)?;

        let mut rebuilt = RecordManager::<User>::in_memory(manager.snapshot().to_vec())?;
        let confirm = rebuilt.open_delete_confirm(&first);
        assert!(rebuilt.confirm_delete(&confirm)?);
        let second = rebuilt.submit(&form)?;
        assert_ne!(first.id, second.id);
        assert_eq!(second.id.as_str(), "u_2");
        Ok(())
    }

    #[test]
    fn resume_ignores_foreign_ids() -> Result<()> {
        let mut draft = RecordManager::<User>::in_memory(Vec::new())?
            .open_create_form(today())
            .draft;
        draft.full_name = "A".to_owned();
        draft.email = "a@x".to_owned();
        let users = ["u_7", "u9", "pkg_40"]
            .into_iter()
            .map(|id| User::from_draft(RecordId::from(id), &draft))
            .collect::<Result<Vec<_>, _>>()?;
        let allocator = IdAllocator::resume("u", &users);
        let (id, _) = allocator.candidate(&users);
        assert_eq!(id.as_str(), "u_8");
        Ok(())
    }

    #[test]
    fn invalid_submit_does_not_burn_an_id() -> Result<()> {
        let mut manager = RecordManager::<User>::in_memory(Vec::new())?;
        let mut form = manager.open_create_form(today());
        let err = manager.submit(&form).expect_err("blank name rejected");
        assert!(matches!(
            err,
            SubmitError::Invalid(ValidationError::Required { .. })
        ));

        form.draft.full_name = "B".to_owned();
        form.draft.email = "b@x".to_owned();
        assert_eq!(manager.submit(&form)?.id.as_str(), "u_1");
        Ok(())
    }

    #[test]
    fn packages_append_at_the_back() -> Result<()> {
        assert_eq!(Package::INSERT_AT, InsertPosition::Back);
        let mut manager = RecordManager::<Package>::in_memory(Vec::new())?;
        let form = manager.open_create_form(today());
        manager.submit(&form)?;
        let mut second = manager.open_create_form(today());
        second.draft.code_name = "Pro".to_owned();
        manager.submit(&second)?;
        let names: Vec<String> = manager
            .snapshot()
            .iter()
            .map(|package| package.code_name.clone())
            .collect();
        assert_eq!(names, vec!["New package", "Pro"]);
        Ok(())
    }

    #[test]
    fn payload_for_wrong_kind_is_a_store_error() -> Result<()> {
        let mut manager = RecordManager::<User>::in_memory(Vec::new())?;
        let form = FormState::create(FormPayload::blank_for(RecordKind::Package, today()));
        let err = manager
            .submit_payload(form)
            .expect_err("kind mismatch should fail");
        assert!(matches!(err, SubmitError::Store(_)));
        assert!(manager.is_empty());
        Ok(())
    }

    #[test]
    fn erased_page_round_trips_edits() -> Result<()> {
        let mut manager = RecordManager::<User>::in_memory(Vec::new())?;
        let page: &mut dyn RecordPage = &mut manager;
        let mut form = page.blank_form(today());
        form.draft.set_field_text(0, "Chi")?;
        form.draft.set_field_text(1, "chi@x.com")?;
        let id = page.submit_payload(form)?;

        let mut edit = page.edit_form(&id).expect("record exists");
        edit.draft.set_field_text(0, "Chi Le")?;
        assert_eq!(page.submit_payload(edit)?, id);
        assert!(page.edit_form(&RecordId::from("u_404")).is_none());

        let table = page.table_page();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[0], "Chi Le");
        Ok(())
    }
}
