// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use time::Date;

use crate::forms::{
    CompanyDraft, DraftPayload, FormFields, PackageDraft, PaymentDraft, QuestionDraft,
    RecruiterDraft, ReportDraft, UserDraft,
};
use crate::ids::RecordId;
use crate::model::{
    Company, CompanyStatus, Difficulty, Package, PackageFeature, PackageTheme, Payment,
    PaymentMethod, PaymentStatus, Question, QuestionCategory, RecordKind, Recruiter,
    RecruiterStatus, Report, ReportStatus, ReportType, User, UserPlan, UserStatus,
};
use crate::query::{Choice, FilterSet, FilterSlot, keyword_matches};
use crate::validation::{
    ValidationResult, clamp_percent, coerce_count, format_date, format_vnd, optional_email,
    parse_date, required_email, required_text,
};

pub const NEW_PACKAGE_NAME: &str = "New package";
pub const DEFAULT_PACKAGE_SUBTITLE: &str = "1 month";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Front,
    Back,
}

/// Per-kind schema driving the generic record manager.
pub trait ManagedRecord:
    Clone + std::fmt::Debug + PartialEq + Serialize + Send + Sync + 'static
{
    type Draft: DraftPayload + FormFields + Clone + std::fmt::Debug + PartialEq;
    type Filter: FilterSet;

    const KIND: RecordKind;
    const PAGE_SIZE: usize;
    const INSERT_AT: InsertPosition;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &RecordId;
    fn search_fields(&self) -> Vec<&str>;
    fn matches_filter(&self, filter: &Self::Filter) -> bool;
    fn blank_draft(today: Date) -> Self::Draft;
    fn to_draft(&self) -> Self::Draft;
    /// Validates `draft` and builds the normalized record.
    fn from_draft(id: RecordId, draft: &Self::Draft) -> ValidationResult<Self>;
    fn cells(&self) -> Vec<String>;
    /// Short name used in delete confirmations.
    fn label(&self) -> String;

    fn matches(&self, keyword: &str, filter: &Self::Filter) -> bool {
        keyword_matches(keyword, &self.search_fields()) && self.matches_filter(filter)
    }
}

macro_rules! filter_set {
    ($name:ident { $($field:ident : $value:ty => $label:literal),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            $(pub $field: Choice<$value>),*
        }

        impl FilterSet for $name {
            fn slots(&self) -> Vec<FilterSlot> {
                vec![$(FilterSlot { name: $label, value: self.$field.label() }),*]
            }

            #[allow(unused_assignments)]
            fn cycle(&mut self, slot: usize) {
                let mut index = 0;
                $(
                    if index == slot {
                        self.$field = self.$field.cycle();
                        return;
                    }
                    index += 1;
                )*
            }
        }
    };
}

filter_set!(UserFilter {
    status: UserStatus => "status",
    plan: UserPlan => "plan",
});

filter_set!(RecruiterFilter {
    status: RecruiterStatus => "status",
});

filter_set!(QuestionFilter {
    category: QuestionCategory => "category",
    difficulty: Difficulty => "difficulty",
});

filter_set!(CompanyFilter {
    status: CompanyStatus => "status",
});

filter_set!(PackageFilter {
    theme: PackageTheme => "theme",
});

filter_set!(PaymentFilter {
    status: PaymentStatus => "status",
    method: PaymentMethod => "method",
});

filter_set!(ReportFilter {
    report_type: ReportType => "type",
    status: ReportStatus => "status",
});

impl ManagedRecord for User {
    type Draft = UserDraft;
    type Filter = UserFilter;

    const KIND: RecordKind = RecordKind::User;
    const PAGE_SIZE: usize = 6;
    const INSERT_AT: InsertPosition = InsertPosition::Front;
    const COLUMNS: &'static [&'static str] =
        &["Name", "Email", "Plan", "Status", "Interviews", "Joined"];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str()]
    }

    fn matches_filter(&self, filter: &UserFilter) -> bool {
        filter.status.admits(self.status) && filter.plan.admits(self.plan)
    }

    fn blank_draft(today: Date) -> UserDraft {
        UserDraft::blank(today)
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            plan: self.plan,
            status: self.status,
            interviews: self.interviews.to_string(),
            joined_at: format_date(self.joined_at),
        }
    }

    fn from_draft(id: RecordId, draft: &UserDraft) -> ValidationResult<Self> {
        Ok(Self {
            id,
            full_name: required_text("full name", &draft.full_name)?,
            email: required_email("email", &draft.email)?,
            plan: draft.plan,
            status: draft.status,
            interviews: coerce_count(&draft.interviews),
            joined_at: parse_date("joined date", &draft.joined_at)?,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.email.clone(),
            self.plan.to_string(),
            self.status.to_string(),
            self.interviews.to_string(),
            format_date(self.joined_at),
        ]
    }

    fn label(&self) -> String {
        self.full_name.clone()
    }
}

impl ManagedRecord for Recruiter {
    type Draft = RecruiterDraft;
    type Filter = RecruiterFilter;

    const KIND: RecordKind = RecordKind::Recruiter;
    const PAGE_SIZE: usize = 10;
    const INSERT_AT: InsertPosition = InsertPosition::Front;
    const COLUMNS: &'static [&'static str] =
        &["Company", "Email", "Phone", "Candidates", "Status", "Joined"];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.company_name.as_str(), self.email.as_str(), self.phone.as_str()]
    }

    fn matches_filter(&self, filter: &RecruiterFilter) -> bool {
        filter.status.admits(self.status)
    }

    fn blank_draft(today: Date) -> RecruiterDraft {
        RecruiterDraft::blank(today)
    }

    fn to_draft(&self) -> RecruiterDraft {
        RecruiterDraft {
            company_name: self.company_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            candidates: self.candidates.to_string(),
            status: self.status,
            joined_at: format_date(self.joined_at),
        }
    }

    fn from_draft(id: RecordId, draft: &RecruiterDraft) -> ValidationResult<Self> {
        Ok(Self {
            id,
            company_name: required_text("company name", &draft.company_name)?,
            email: required_email("email", &draft.email)?,
            phone: required_text("phone", &draft.phone)?,
            candidates: coerce_count(&draft.candidates),
            status: draft.status,
            joined_at: parse_date("joined date", &draft.joined_at)?,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.company_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.candidates.to_string(),
            self.status.to_string(),
            format_date(self.joined_at),
        ]
    }

    fn label(&self) -> String {
        self.company_name.clone()
    }
}

impl ManagedRecord for Question {
    type Draft = QuestionDraft;
    type Filter = QuestionFilter;

    const KIND: RecordKind = RecordKind::Question;
    const PAGE_SIZE: usize = 10;
    const INSERT_AT: InsertPosition = InsertPosition::Front;
    const COLUMNS: &'static [&'static str] =
        &["Question", "Category", "Difficulty", "Used", "AI score"];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.text.as_str()]
    }

    fn matches_filter(&self, filter: &QuestionFilter) -> bool {
        filter.category.admits(self.category) && filter.difficulty.admits(self.difficulty)
    }

    fn blank_draft(_today: Date) -> QuestionDraft {
        QuestionDraft::blank()
    }

    fn to_draft(&self) -> QuestionDraft {
        QuestionDraft {
            text: self.text.clone(),
            category: self.category,
            difficulty: self.difficulty,
            used_count: self.used_count.to_string(),
            ai_score: self.ai_score.to_string(),
        }
    }

    fn from_draft(id: RecordId, draft: &QuestionDraft) -> ValidationResult<Self> {
        Ok(Self {
            id,
            text: required_text("question", &draft.text)?,
            category: draft.category,
            difficulty: draft.difficulty,
            used_count: coerce_count(&draft.used_count),
            ai_score: clamp_percent(coerce_count(&draft.ai_score)),
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.text.clone(),
            self.category.to_string(),
            self.difficulty.to_string(),
            self.used_count.to_string(),
            format!("{}%", self.ai_score),
        ]
    }

    fn label(&self) -> String {
        self.text.clone()
    }
}

impl ManagedRecord for Company {
    type Draft = CompanyDraft;
    type Filter = CompanyFilter;

    const KIND: RecordKind = RecordKind::Company;
    const PAGE_SIZE: usize = 10;
    const INSERT_AT: InsertPosition = InsertPosition::Front;
    const COLUMNS: &'static [&'static str] = &["Name", "Industry", "Size", "Interviews", "Status"];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.industry.as_str()]
    }

    fn matches_filter(&self, filter: &CompanyFilter) -> bool {
        filter.status.admits(self.status)
    }

    fn blank_draft(_today: Date) -> CompanyDraft {
        CompanyDraft::blank()
    }

    fn to_draft(&self) -> CompanyDraft {
        CompanyDraft {
            name: self.name.clone(),
            industry: self.industry.clone(),
            size: self.size,
            interviews: self.interviews.to_string(),
            status: self.status,
        }
    }

    fn from_draft(id: RecordId, draft: &CompanyDraft) -> ValidationResult<Self> {
        Ok(Self {
            id,
            name: required_text("company name", &draft.name)?,
            industry: required_text("industry", &draft.industry)?,
            size: draft.size,
            interviews: coerce_count(&draft.interviews),
            status: draft.status,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.industry.clone(),
            self.size.to_string(),
            self.interviews.to_string(),
            self.status.to_string(),
        ]
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl ManagedRecord for Package {
    type Draft = PackageDraft;
    type Filter = PackageFilter;

    const KIND: RecordKind = RecordKind::Package;
    const PAGE_SIZE: usize = 12;
    const INSERT_AT: InsertPosition = InsertPosition::Back;
    const COLUMNS: &'static [&'static str] =
        &["Package", "Subtitle", "Price", "Subscribers", "Theme", "Features"];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code_name.as_str(), self.subtitle.as_str()]
    }

    fn matches_filter(&self, filter: &PackageFilter) -> bool {
        filter.theme.admits(self.theme)
    }

    fn blank_draft(_today: Date) -> PackageDraft {
        PackageDraft::blank()
    }

    fn to_draft(&self) -> PackageDraft {
        let mut draft = PackageDraft::blank();
        for (slot, feature) in draft.features.iter_mut().enumerate() {
            *feature = self
                .features
                .get(slot)
                .cloned()
                .unwrap_or_else(|| PackageFeature::new("", false));
        }
        draft.code_name = self.code_name.clone();
        draft.subtitle = self.subtitle.clone();
        draft.price_vnd = self.price_vnd.to_string();
        draft.subscribers = self.subscribers.to_string();
        draft.theme = self.theme;
        draft
    }

    fn from_draft(id: RecordId, draft: &PackageDraft) -> ValidationResult<Self> {
        let code_name = match draft.code_name.trim() {
            "" => NEW_PACKAGE_NAME.to_owned(),
            name => name.to_owned(),
        };
        let subtitle = match draft.subtitle.trim() {
            "" => DEFAULT_PACKAGE_SUBTITLE.to_owned(),
            subtitle => subtitle.to_owned(),
        };
        let features = draft
            .features
            .iter()
            .filter(|feature| !feature.label.trim().is_empty())
            .map(|feature| PackageFeature::new(feature.label.trim(), feature.enabled))
            .collect();
        Ok(Self {
            id,
            code_name,
            subtitle,
            price_vnd: coerce_count(&draft.price_vnd),
            subscribers: coerce_count(&draft.subscribers),
            theme: draft.theme,
            features,
        })
    }

    fn cells(&self) -> Vec<String> {
        let enabled = self
            .features
            .iter()
            .filter(|feature| feature.enabled)
            .count();
        vec![
            self.code_name.clone(),
            self.subtitle.clone(),
            format_vnd(self.price_vnd),
            self.subscribers.to_string(),
            self.theme.to_string(),
            format!("{enabled}/{}", self.features.len()),
        ]
    }

    fn label(&self) -> String {
        self.code_name.clone()
    }
}

impl ManagedRecord for Payment {
    type Draft = PaymentDraft;
    type Filter = PaymentFilter;

    const KIND: RecordKind = RecordKind::Payment;
    const PAGE_SIZE: usize = 5;
    const INSERT_AT: InsertPosition = InsertPosition::Front;
    const COLUMNS: &'static [&'static str] = &[
        "Payer", "Package", "Amount", "Method", "Status", "Date", "Transaction",
    ];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.payer_name.as_str(), self.transaction_code.as_str(), self.email.as_str()]
    }

    fn matches_filter(&self, filter: &PaymentFilter) -> bool {
        filter.status.admits(self.status) && filter.method.admits(self.method)
    }

    fn blank_draft(today: Date) -> PaymentDraft {
        PaymentDraft::blank(today)
    }

    fn to_draft(&self) -> PaymentDraft {
        PaymentDraft {
            payer_name: self.payer_name.clone(),
            package_name: self.package_name.clone(),
            amount_vnd: self.amount_vnd.to_string(),
            method: self.method,
            status: self.status,
            paid_on: format_date(self.paid_on),
            transaction_code: self.transaction_code.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }

    fn from_draft(id: RecordId, draft: &PaymentDraft) -> ValidationResult<Self> {
        Ok(Self {
            id,
            payer_name: required_text("payer name", &draft.payer_name)?,
            package_name: required_text("package", &draft.package_name)?,
            amount_vnd: coerce_count(&draft.amount_vnd),
            method: draft.method,
            status: draft.status,
            paid_on: parse_date("payment date", &draft.paid_on)?,
            transaction_code: draft.transaction_code.trim().to_owned(),
            email: optional_email("email", &draft.email)?,
            phone: draft.phone.trim().to_owned(),
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.payer_name.clone(),
            self.package_name.clone(),
            format_vnd(self.amount_vnd),
            self.method.to_string(),
            self.status.to_string(),
            format_date(self.paid_on),
            self.transaction_code.clone(),
        ]
    }

    fn label(&self) -> String {
        format!("{} ({})", self.payer_name, self.transaction_code)
    }
}

impl ManagedRecord for Report {
    type Draft = ReportDraft;
    type Filter = ReportFilter;

    const KIND: RecordKind = RecordKind::Report;
    const PAGE_SIZE: usize = 10;
    const INSERT_AT: InsertPosition = InsertPosition::Front;
    const COLUMNS: &'static [&'static str] =
        &["Name", "Type", "Created", "Status", "Downloads", "Size"];

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn matches_filter(&self, filter: &ReportFilter) -> bool {
        filter.report_type.admits(self.report_type) && filter.status.admits(self.status)
    }

    fn blank_draft(today: Date) -> ReportDraft {
        ReportDraft::blank(today)
    }

    fn to_draft(&self) -> ReportDraft {
        ReportDraft {
            name: self.name.clone(),
            report_type: self.report_type,
            status: self.status,
            downloads: self.downloads.to_string(),
            size_label: self.size_label.clone(),
            created_on: format_date(self.created_on),
        }
    }

    fn from_draft(id: RecordId, draft: &ReportDraft) -> ValidationResult<Self> {
        let size_label = match draft.size_label.trim() {
            "" => "-".to_owned(),
            size => size.to_owned(),
        };
        Ok(Self {
            id,
            name: required_text("report name", &draft.name)?,
            report_type: draft.report_type,
            created_on: parse_date("created date", &draft.created_on)?,
            status: draft.status,
            downloads: coerce_count(&draft.downloads),
            size_label,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.report_type.to_string(),
            format_date(self.created_on),
            self.status.to_string(),
            self.downloads.to_string(),
            self.size_label.clone(),
        ]
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
