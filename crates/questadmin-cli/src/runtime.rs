// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use questadmin_app::{
    AuthClient, AuthError, ConfirmState, Credentials, FormFields, FormPayload, FormState,
    MonitoringSnapshot, OverviewCounts, RecordId, RecordKind, Session, TablePage, TimeRange,
    ValidationError,
};
use questadmin_store::{AdminStore, LocalAuthClient, SubmitError};
use questadmin_tui::{AdminRuntime, SettingsView, SubmitOutcome};
use std::fs;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};
use tracing::info;

/// Front-end runtime over the in-memory admin store.
pub struct StoreRuntime {
    store: AdminStore,
    auth: LocalAuthClient,
    download_dir: PathBuf,
    today: Date,
}

impl StoreRuntime {
    pub fn new(store: AdminStore, auth: LocalAuthClient, download_dir: PathBuf) -> Self {
        Self {
            store,
            auth,
            download_dir,
            today: OffsetDateTime::now_utc().date(),
        }
    }

    #[cfg(test)]
    fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }
}

impl AuthClient for StoreRuntime {
    fn sign_in(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.auth.sign_in(credentials)
    }

    fn sign_out(&mut self, session: &Session) {
        self.auth.sign_out(session);
    }
}

impl AdminRuntime for StoreRuntime {
    fn today(&self) -> Date {
        self.today
    }

    fn overview(&mut self) -> Result<OverviewCounts> {
        Ok(self.store.overview())
    }

    fn table_page(&mut self, kind: RecordKind) -> Result<TablePage> {
        Ok(self.store.page_mut(kind).table_page())
    }

    fn set_keyword(&mut self, kind: RecordKind, keyword: &str) -> Result<()> {
        self.store.page_mut(kind).set_keyword(keyword);
        Ok(())
    }

    fn cycle_filter(&mut self, kind: RecordKind, slot: usize) -> Result<()> {
        self.store.page_mut(kind).cycle_filter(slot);
        Ok(())
    }

    fn goto_page(&mut self, kind: RecordKind, page: usize) -> Result<()> {
        self.store.page_mut(kind).goto_page(page);
        Ok(())
    }

    fn blank_form(&mut self, kind: RecordKind) -> Result<FormState<FormPayload>> {
        Ok(self.store.page(kind).blank_form(self.today))
    }

    fn edit_form(
        &mut self,
        kind: RecordKind,
        id: &RecordId,
    ) -> Result<Option<FormState<FormPayload>>> {
        Ok(self.store.page(kind).edit_form(id))
    }

    fn submit_form(
        &mut self,
        kind: RecordKind,
        form: FormState<FormPayload>,
    ) -> Result<SubmitOutcome> {
        match self.store.page_mut(kind).submit_payload(form) {
            Ok(id) => Ok(SubmitOutcome::Saved(id)),
            Err(SubmitError::Invalid(error)) => Ok(SubmitOutcome::Rejected(error)),
            Err(SubmitError::Store(error)) => {
                Err(error.context(format!("save {}", kind.as_str())))
            }
        }
    }

    fn delete_confirm(&mut self, kind: RecordKind, id: &RecordId) -> Result<Option<ConfirmState>> {
        Ok(self.store.page(kind).delete_confirm(id))
    }

    fn confirm_delete(&mut self, kind: RecordKind, confirm: &ConfirmState) -> Result<bool> {
        self.store.page_mut(kind).confirm_delete(confirm)
    }

    fn download_report(&mut self, id: &RecordId) -> Result<String> {
        let body = self.store.download_report(id)?;
        fs::create_dir_all(&self.download_dir).with_context(|| {
            format!(
                "create download directory {} -- set [ui].download_dir to a writable path",
                self.download_dir.display()
            )
        })?;
        let path = self.download_dir.join(format!("{id}.json"));
        fs::write(&path, body).with_context(|| format!("write report {}", path.display()))?;
        info!(id = %id, path = %path.display(), "report written");
        Ok(format!("downloaded {id} to {}", path.display()))
    }

    fn settings(&mut self) -> Result<SettingsView> {
        let settings = self.store.settings();
        Ok(SettingsView {
            draft: settings.draft().clone(),
            dirty: settings.is_dirty(),
            action: settings.action().clone(),
        })
    }

    fn edit_setting(&mut self, index: usize, value: &str) -> Result<(), ValidationError> {
        self.store
            .settings_mut()
            .draft_mut()
            .set_field_text(index, value)
    }

    fn cycle_setting(&mut self, index: usize) {
        self.store.settings_mut().draft_mut().cycle_field(index);
    }

    fn save_settings(&mut self) -> Result<(), ValidationError> {
        self.store.settings_mut().save()
    }

    fn revert_settings(&mut self) {
        self.store.settings_mut().revert();
        info!("settings reverted");
    }

    fn refresh_monitoring(&mut self, range: TimeRange) -> Result<MonitoringSnapshot> {
        Ok(self.store.refresh_monitoring(range).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::StoreRuntime;
    use anyhow::Result;
    use questadmin_app::{FormFields, RecordId, RecordKind, TimeRange, ValidationError};
    use questadmin_store::{AdminStore, LocalAuthClient};
    use questadmin_testkit::fixture_date;
    use questadmin_tui::{AdminRuntime, SubmitOutcome};

    fn runtime(download_dir: &std::path::Path) -> Result<StoreRuntime> {
        Ok(StoreRuntime::new(
            AdminStore::demo()?,
            LocalAuthClient::default(),
            download_dir.to_path_buf(),
        )
        .with_today(fixture_date()))
    }

    #[test]
    fn submit_maps_validation_to_rejection() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = runtime(temp.path())?;
        let before = runtime.table_page(RecordKind::Company)?.window.total_count;

        let form = runtime.blank_form(RecordKind::Company)?;
        let outcome = runtime.submit_form(RecordKind::Company, form)?;
        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected(ValidationError::Required { .. })
        ));
        assert_eq!(
            runtime.table_page(RecordKind::Company)?.window.total_count,
            before
        );
        Ok(())
    }

    #[test]
    fn created_user_lands_on_first_row() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = runtime(temp.path())?;
        let mut form = runtime.blank_form(RecordKind::User)?;
        form.draft.set_field_text(0, "Test User")?;
        form.draft.set_field_text(1, "test@x.com")?;
        let SubmitOutcome::Saved(id) = runtime.submit_form(RecordKind::User, form)? else {
            panic!("valid user should save");
        };

        let table = runtime.table_page(RecordKind::User)?;
        assert_eq!(table.rows[0].id, id);
        assert_eq!(table.rows[0].cells[0], "Test User");
        Ok(())
    }

    #[test]
    fn delete_through_confirm() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = runtime(temp.path())?;
        let id = RecordId::from("q1");
        let confirm = runtime
            .delete_confirm(RecordKind::Question, &id)?
            .expect("q1 exists");
        assert!(runtime.confirm_delete(RecordKind::Question, &confirm)?);
        assert!(runtime.delete_confirm(RecordKind::Question, &id)?.is_none());
        Ok(())
    }

    #[test]
    fn download_writes_report_json() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = runtime(temp.path())?;
        let message = runtime.download_report(&RecordId::from("rep2"))?;
        let path = temp.path().join("rep2.json");
        assert!(message.contains("rep2.json"));
        let written = std::fs::read_to_string(path)?;
        assert!(written.contains("\"id\": \"rep2\""));

        let error = runtime
            .download_report(&RecordId::from("rep4"))
            .expect_err("processing report");
        assert!(error.to_string().contains("still processing"));
        assert!(!temp.path().join("rep4.json").exists());
        Ok(())
    }

    #[test]
    fn settings_round_trip_through_runtime() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = runtime(temp.path())?;
        runtime.edit_setting(12, "2525")?;
        assert!(runtime.settings()?.dirty);
        runtime.save_settings()?;
        let view = runtime.settings()?;
        assert!(!view.dirty);
        assert_eq!(view.draft.email.smtp_port, 2525);
        assert_eq!(view.action.message(), Some("settings saved"));

        runtime.edit_setting(12, "0")?;
        assert!(runtime.save_settings().is_err());
        runtime.revert_settings();
        assert_eq!(runtime.settings()?.draft.email.smtp_port, 2525);
        Ok(())
    }

    #[test]
    fn monitoring_scales_with_range() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = runtime(temp.path())?;
        let day = runtime.refresh_monitoring(TimeRange::Day)?.summary();
        let week = runtime.refresh_monitoring(TimeRange::Week)?.summary();
        assert_eq!(week.total_requests, day.total_requests * 7);
        Ok(())
    }
}
