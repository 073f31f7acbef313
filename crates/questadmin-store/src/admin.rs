// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use questadmin_app::{
    ActionState, Company, ManagedRecord, MonitoringSnapshot, OverviewCounts, Package, Payment,
    PaymentStatus, Question, RecordId, RecordKind, Recruiter, Report, ReportStatus,
    SystemSettings, TimeRange, User, UserPlan, UserStatus,
};
use tracing::{info, warn};

use crate::manager::{RecordManager, RecordPage};
use crate::seed;
use crate::settings::SettingsStore;

/// Last refreshed AI usage plus the state of the refresh action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringFeed {
    snapshot: MonitoringSnapshot,
    action: ActionState,
}

impl MonitoringFeed {
    fn empty(range: TimeRange) -> Self {
        Self {
            snapshot: MonitoringSnapshot {
                range,
                models: Vec::new(),
                alerts: Vec::new(),
                activities: Vec::new(),
            },
            action: ActionState::Idle,
        }
    }

    pub fn snapshot(&self) -> &MonitoringSnapshot {
        &self.snapshot
    }

    pub fn action(&self) -> &ActionState {
        &self.action
    }
}

/// Every record collection the dashboard manages, plus settings and the
/// monitoring feed.
#[derive(Debug, Clone)]
pub struct AdminStore {
    users: RecordManager<User>,
    recruiters: RecordManager<Recruiter>,
    questions: RecordManager<Question>,
    companies: RecordManager<Company>,
    packages: RecordManager<Package>,
    payments: RecordManager<Payment>,
    reports: RecordManager<Report>,
    settings: SettingsStore,
    monitoring: MonitoringFeed,
    download: ActionState,
    seeded: bool,
}

impl AdminStore {
    pub fn empty() -> Result<Self> {
        Ok(Self {
            users: RecordManager::in_memory(Vec::new())?,
            recruiters: RecordManager::in_memory(Vec::new())?,
            questions: RecordManager::in_memory(Vec::new())?,
            companies: RecordManager::in_memory(Vec::new())?,
            packages: RecordManager::in_memory(Vec::new())?,
            payments: RecordManager::in_memory(Vec::new())?,
            reports: RecordManager::in_memory(Vec::new())?,
            settings: SettingsStore::default(),
            monitoring: MonitoringFeed::empty(TimeRange::Day),
            download: ActionState::Idle,
            seeded: false,
        })
    }

    /// Store loaded with the demo collections.
    pub fn demo() -> Result<Self> {
        let mut store = Self {
            users: RecordManager::in_memory(seed::demo_users()?)?,
            recruiters: RecordManager::in_memory(seed::demo_recruiters()?)?,
            questions: RecordManager::in_memory(seed::demo_questions())?,
            companies: RecordManager::in_memory(seed::demo_companies())?,
            packages: RecordManager::in_memory(seed::demo_packages())?,
            payments: RecordManager::in_memory(seed::demo_payments()?)?,
            reports: RecordManager::in_memory(seed::demo_reports()?)?,
            settings: SettingsStore::default(),
            monitoring: MonitoringFeed::empty(TimeRange::Day),
            download: ActionState::Idle,
            seeded: true,
        };
        store.refresh_monitoring(TimeRange::Day);
        info!(users = store.users.len(), "demo data loaded");
        Ok(store)
    }

    pub fn users(&self) -> &RecordManager<User> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut RecordManager<User> {
        &mut self.users
    }

    pub fn packages(&self) -> &RecordManager<Package> {
        &self.packages
    }

    pub fn reports(&self) -> &RecordManager<Report> {
        &self.reports
    }

    pub fn page(&self, kind: RecordKind) -> &dyn RecordPage {
        match kind {
            RecordKind::User => &self.users,
            RecordKind::Recruiter => &self.recruiters,
            RecordKind::Question => &self.questions,
            RecordKind::Company => &self.companies,
            RecordKind::Package => &self.packages,
            RecordKind::Payment => &self.payments,
            RecordKind::Report => &self.reports,
        }
    }

    pub fn page_mut(&mut self, kind: RecordKind) -> &mut dyn RecordPage {
        match kind {
            RecordKind::User => &mut self.users,
            RecordKind::Recruiter => &mut self.recruiters,
            RecordKind::Question => &mut self.questions,
            RecordKind::Company => &mut self.companies,
            RecordKind::Package => &mut self.packages,
            RecordKind::Payment => &mut self.payments,
            RecordKind::Report => &mut self.reports,
        }
    }

    pub fn set_page_size(&mut self, kind: RecordKind, page_size: usize) {
        match kind {
            RecordKind::User => self.users.set_page_size(page_size),
            RecordKind::Recruiter => self.recruiters.set_page_size(page_size),
            RecordKind::Question => self.questions.set_page_size(page_size),
            RecordKind::Company => self.companies.set_page_size(page_size),
            RecordKind::Package => self.packages.set_page_size(page_size),
            RecordKind::Payment => self.payments.set_page_size(page_size),
            RecordKind::Report => self.reports.set_page_size(page_size),
        }
    }

    pub fn overview(&self) -> OverviewCounts {
        let users = self.users.snapshot();
        let payments = self.payments.snapshot();
        let reports = self.reports.snapshot();
        OverviewCounts {
            users: users.len(),
            active_users: users
                .iter()
                .filter(|user| user.status == UserStatus::Active)
                .count(),
            premium_users: users
                .iter()
                .filter(|user| user.plan == UserPlan::Premium)
                .count(),
            recruiters: self.recruiters.len(),
            questions: self.questions.len(),
            companies: self.companies.len(),
            revenue_vnd: payments
                .iter()
                .filter(|payment| payment.status == PaymentStatus::Success)
                .map(|payment| payment.amount_vnd)
                .fold(0, i64::saturating_add),
            pending_payments: payments
                .iter()
                .filter(|payment| payment.status == PaymentStatus::Pending)
                .count(),
            reports_processing: reports
                .iter()
                .filter(|report| report.status == ReportStatus::Processing)
                .count(),
        }
    }

    pub fn export_json(&self, kind: RecordKind) -> Result<String> {
        self.page(kind).export_json()
    }

    /// Renders a completed report as JSON and counts the download.
    pub fn download_report(&mut self, id: &RecordId) -> Result<String> {
        self.download = ActionState::Pending;
        let result = self.render_download(id);
        self.download = match &result {
            Ok(_) => ActionState::Succeeded(format!("downloaded {id}")),
            Err(error) => ActionState::Failed(error.to_string()),
        };
        result
    }

    fn render_download(&mut self, id: &RecordId) -> Result<String> {
        let Some(mut report) = self.reports.find(id) else {
            bail!("report {id} not found -- reload the reports list and retry");
        };
        if report.status != ReportStatus::Completed {
            warn!(id = %id, "download refused, report still processing");
            bail!(
                "report {} is still {} -- wait for it to complete and retry",
                report.label(),
                report.status
            );
        }
        report.downloads += 1;
        let body = serde_json::to_string_pretty(&report)
            .with_context(|| format!("serialize report {id}"))?;
        self.reports
            .update(report)
            .with_context(|| format!("record download of report {id}"))?;
        info!(id = %id, "report downloaded");
        Ok(body)
    }

    pub fn download_action(&self) -> &ActionState {
        &self.download
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn saved_settings(&self) -> &SystemSettings {
        self.settings.saved()
    }

    pub fn monitoring(&self) -> &MonitoringFeed {
        &self.monitoring
    }

    /// Loads usage for `range`. An empty store has no usage to report.
    pub fn refresh_monitoring(&mut self, range: TimeRange) -> &MonitoringSnapshot {
        info!(range = range.as_str(), "refreshing AI monitoring");
        self.monitoring.action = ActionState::Pending;
        self.monitoring.snapshot = if self.seeded {
            seed::demo_monitoring(range)
        } else {
            MonitoringFeed::empty(range).snapshot
        };
        self.monitoring.action = ActionState::Succeeded(format!("refreshed {range}"));
        &self.monitoring.snapshot
    }

    pub fn record_count(&self, kind: RecordKind) -> usize {
        self.page(kind).len()
    }

    /// Kind for a page key such as `users`, for CLI lookups.
    pub fn kind_for_key(key: &str) -> Result<RecordKind> {
        questadmin_app::PageKind::parse(key)
            .and_then(questadmin_app::PageKind::record_kind)
            .ok_or_else(|| {
                anyhow!(
                    "{key:?} is not a record page -- use one of {}",
                    RecordKind::ALL
                        .iter()
                        .map(|kind| kind.page().key())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}
