// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::model::{
    CompanySize, CompanyStatus, Difficulty, Labeled, PackageFeature, PackageTheme, PaymentMethod,
    PaymentStatus, QuestionCategory, RecordKind, RecruiterStatus, ReportStatus, ReportType,
    UserPlan, UserStatus,
};
use crate::validation::{ValidationResult, format_date};

pub const PACKAGE_FEATURE_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    Number,
    Date,
    Choice,
    Toggle,
}

impl FieldInput {
    /// Whether the field takes typed input rather than cycling.
    pub fn is_typed(self) -> bool {
        matches!(self, Self::Text | Self::Number | Self::Date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub input: FieldInput,
}

const fn text(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        input: FieldInput::Text,
    }
}

const fn number(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        input: FieldInput::Number,
    }
}

const fn date(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        input: FieldInput::Date,
    }
}

const fn choice(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        input: FieldInput::Choice,
    }
}

const fn toggle(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        input: FieldInput::Toggle,
    }
}

/// Indexed field access used by the form editor.
pub trait FormFields {
    fn fields(&self) -> &'static [FieldSpec];
    fn field_text(&self, index: usize) -> String;
    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()>;
    fn cycle_field(&mut self, index: usize);
}

fn yes_no(value: bool) -> String {
    let label = if value { "yes" } else { "no" };
    label.to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub plan: UserPlan,
    pub status: UserStatus,
    pub interviews: String,
    pub joined_at: String,
}

impl UserDraft {
    const FIELDS: &'static [FieldSpec] = &[
        text("Full name"),
        text("Email"),
        choice("Plan"),
        choice("Status"),
        number("Interviews"),
        date("Joined"),
    ];

    pub fn blank(today: Date) -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            plan: UserPlan::Free,
            status: UserStatus::Active,
            interviews: "0".to_owned(),
            joined_at: format_date(today),
        }
    }
}

impl FormFields for UserDraft {
    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        match index {
            0 => self.full_name.clone(),
            1 => self.email.clone(),
            2 => self.plan.label().to_owned(),
            3 => self.status.label().to_owned(),
            4 => self.interviews.clone(),
            5 => self.joined_at.clone(),
            _ => String::new(),
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let slot = match index {
            0 => &mut self.full_name,
            1 => &mut self.email,
            4 => &mut self.interviews,
            5 => &mut self.joined_at,
            _ => return Ok(()),
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        match index {
            2 => self.plan = self.plan.next(),
            3 => self.status = self.status.next(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecruiterDraft {
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub candidates: String,
    pub status: RecruiterStatus,
    pub joined_at: String,
}

impl RecruiterDraft {
    const FIELDS: &'static [FieldSpec] = &[
        text("Company"),
        text("Email"),
        text("Phone"),
        number("Candidates"),
        choice("Status"),
        date("Joined"),
    ];

    pub fn blank(today: Date) -> Self {
        Self {
            company_name: String::new(),
            email: String::new(),
            phone: String::new(),
            candidates: "0".to_owned(),
            status: RecruiterStatus::Active,
            joined_at: format_date(today),
        }
    }
}

impl FormFields for RecruiterDraft {
    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        match index {
            0 => self.company_name.clone(),
            1 => self.email.clone(),
            2 => self.phone.clone(),
            3 => self.candidates.clone(),
            4 => self.status.label().to_owned(),
            5 => self.joined_at.clone(),
            _ => String::new(),
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let slot = match index {
            0 => &mut self.company_name,
            1 => &mut self.email,
            2 => &mut self.phone,
            3 => &mut self.candidates,
            5 => &mut self.joined_at,
            _ => return Ok(()),
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        if index == 4 {
            self.status = self.status.next();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    pub used_count: String,
    pub ai_score: String,
}

impl QuestionDraft {
    const FIELDS: &'static [FieldSpec] = &[
        text("Question"),
        choice("Category"),
        choice("Difficulty"),
        number("Times used"),
        number("AI score"),
    ];

    pub fn blank() -> Self {
        Self {
            text: String::new(),
            category: QuestionCategory::General,
            difficulty: Difficulty::Easy,
            used_count: "0".to_owned(),
            ai_score: "90".to_owned(),
        }
    }
}

impl FormFields for QuestionDraft {
    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        match index {
            0 => self.text.clone(),
            1 => self.category.label().to_owned(),
            2 => self.difficulty.label().to_owned(),
            3 => self.used_count.clone(),
            4 => self.ai_score.clone(),
            _ => String::new(),
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let slot = match index {
            0 => &mut self.text,
            3 => &mut self.used_count,
            4 => &mut self.ai_score,
            _ => return Ok(()),
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        match index {
            1 => self.category = self.category.next(),
            2 => self.difficulty = self.difficulty.next(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
    pub industry: String,
    pub size: CompanySize,
    pub interviews: String,
    pub status: CompanyStatus,
}

impl CompanyDraft {
    const FIELDS: &'static [FieldSpec] = &[
        text("Name"),
        text("Industry"),
        choice("Size"),
        number("Interviews"),
        choice("Status"),
    ];

    pub fn blank() -> Self {
        Self {
            name: String::new(),
            industry: String::new(),
            size: CompanySize::Over10k,
            interviews: "0".to_owned(),
            status: CompanyStatus::Active,
        }
    }
}

impl FormFields for CompanyDraft {
    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.industry.clone(),
            2 => self.size.label().to_owned(),
            3 => self.interviews.clone(),
            4 => self.status.label().to_owned(),
            _ => String::new(),
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let slot = match index {
            0 => &mut self.name,
            1 => &mut self.industry,
            3 => &mut self.interviews,
            _ => return Ok(()),
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        match index {
            2 => self.size = self.size.next(),
            4 => self.status = self.status.next(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDraft {
    pub code_name: String,
    pub subtitle: String,
    pub price_vnd: String,
    pub subscribers: String,
    pub theme: PackageTheme,
    pub features: [PackageFeature; PACKAGE_FEATURE_SLOTS],
}

impl PackageDraft {
    const FIELDS: &'static [FieldSpec] = &[
        text("Code name"),
        text("Subtitle"),
        number("Price (VND)"),
        number("Subscribers"),
        choice("Theme"),
        text("Feature 1"),
        toggle("Feature 1 on"),
        text("Feature 2"),
        toggle("Feature 2 on"),
        text("Feature 3"),
        toggle("Feature 3 on"),
        text("Feature 4"),
        toggle("Feature 4 on"),
    ];
    const FIRST_FEATURE_FIELD: usize = 5;

    pub fn blank() -> Self {
        Self {
            code_name: String::new(),
            subtitle: "1 month".to_owned(),
            price_vnd: "0".to_owned(),
            subscribers: "0".to_owned(),
            theme: PackageTheme::Gray,
            features: [
                PackageFeature::new("5 interviews", true),
                PackageFeature::new("AI analysis", false),
                PackageFeature::new("Video review", false),
                PackageFeature::new("Email support", true),
            ],
        }
    }

    /// Maps a field index onto (feature slot, is the toggle).
    fn feature_slot(index: usize) -> Option<(usize, bool)> {
        let offset = index.checked_sub(Self::FIRST_FEATURE_FIELD)?;
        let slot = offset / 2;
        (slot < PACKAGE_FEATURE_SLOTS).then_some((slot, offset % 2 == 1))
    }
}

impl FormFields for PackageDraft {
    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        match index {
            0 => self.code_name.clone(),
            1 => self.subtitle.clone(),
            2 => self.price_vnd.clone(),
            3 => self.subscribers.clone(),
            4 => self.theme.label().to_owned(),
            _ => match Self::feature_slot(index) {
                Some((slot, false)) => self.features[slot].label.clone(),
                Some((slot, true)) => yes_no(self.features[slot].enabled),
                None => String::new(),
            },
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let slot = match index {
            0 => &mut self.code_name,
            1 => &mut self.subtitle,
            2 => &mut self.price_vnd,
            3 => &mut self.subscribers,
            _ => match Self::feature_slot(index) {
                Some((feature, false)) => &mut self.features[feature].label,
                _ => return Ok(()),
            },
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        if index == 4 {
            self.theme = self.theme.next();
        } else if let Some((slot, true)) = Self::feature_slot(index) {
            self.features[slot].enabled = !self.features[slot].enabled;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    pub payer_name: String,
    pub package_name: String,
    pub amount_vnd: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_on: String,
    pub transaction_code: String,
    pub email: String,
    pub phone: String,
}

impl PaymentDraft {
    const FIELDS: &'static [FieldSpec] = &[
        text("Payer"),
        text("Package"),
        number("Amount (VND)"),
        choice("Method"),
        choice("Status"),
        date("Date"),
        text("Transaction code"),
        text("Email"),
        text("Phone"),
    ];

    pub fn blank(today: Date) -> Self {
        Self {
            payer_name: String::new(),
            package_name: String::new(),
            amount_vnd: "0".to_owned(),
            method: PaymentMethod::Momo,
            status: PaymentStatus::Pending,
            paid_on: format_date(today),
            transaction_code: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

impl FormFields for PaymentDraft {
    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        match index {
            0 => self.payer_name.clone(),
            1 => self.package_name.clone(),
            2 => self.amount_vnd.clone(),
            3 => self.method.label().to_owned(),
            4 => self.status.label().to_owned(),
            5 => self.paid_on.clone(),
            6 => self.transaction_code.clone(),
            7 => self.email.clone(),
            8 => self.phone.clone(),
            _ => String::new(),
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let slot = match index {
            0 => &mut self.payer_name,
            1 => &mut self.package_name,
            2 => &mut self.amount_vnd,
            5 => &mut self.paid_on,
            6 => &mut self.transaction_code,
            7 => &mut self.email,
            8 => &mut self.phone,
            _ => return Ok(()),
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        match index {
            3 => self.method = self.method.next(),
            4 => self.status = self.status.next(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub name: String,
    pub report_type: ReportType,
    pub status: ReportStatus,
    pub downloads: String,
    pub size_label: String,
    pub created_on: String,
}

impl ReportDraft {
    const FIELDS: &'static [FieldSpec] = &[
        text("Name"),
        choice("Type"),
        choice("Status"),
        number("Downloads"),
        text("Size"),
        date("Created"),
    ];

    pub fn blank(today: Date) -> Self {
        Self {
            name: String::new(),
            report_type: ReportType::Users,
            status: ReportStatus::Processing,
            downloads: "0".to_owned(),
            size_label: "-".to_owned(),
            created_on: format_date(today),
        }
    }
}

impl FormFields for ReportDraft {
    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.report_type.label().to_owned(),
            2 => self.status.label().to_owned(),
            3 => self.downloads.clone(),
            4 => self.size_label.clone(),
            5 => self.created_on.clone(),
            _ => String::new(),
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let slot = match index {
            0 => &mut self.name,
            3 => &mut self.downloads,
            4 => &mut self.size_label,
            5 => &mut self.created_on,
            _ => return Ok(()),
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        match index {
            1 => self.report_type = self.report_type.next(),
            2 => self.status = self.status.next(),
            _ => {}
        }
    }
}

/// Kind-erased form draft carried between the runtime and the form editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    User(UserDraft),
    Recruiter(RecruiterDraft),
    Question(QuestionDraft),
    Company(CompanyDraft),
    Package(PackageDraft),
    Payment(PaymentDraft),
    Report(ReportDraft),
}

macro_rules! with_draft {
    ($payload:expr, $draft:ident => $body:expr) => {
        match $payload {
            FormPayload::User($draft) => $body,
            FormPayload::Recruiter($draft) => $body,
            FormPayload::Question($draft) => $body,
            FormPayload::Company($draft) => $body,
            FormPayload::Package($draft) => $body,
            FormPayload::Payment($draft) => $body,
            FormPayload::Report($draft) => $body,
        }
    };
}

impl FormPayload {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::User(_) => RecordKind::User,
            Self::Recruiter(_) => RecordKind::Recruiter,
            Self::Question(_) => RecordKind::Question,
            Self::Company(_) => RecordKind::Company,
            Self::Package(_) => RecordKind::Package,
            Self::Payment(_) => RecordKind::Payment,
            Self::Report(_) => RecordKind::Report,
        }
    }

    pub fn blank_for(kind: RecordKind, today: Date) -> Self {
        match kind {
            RecordKind::User => Self::User(UserDraft::blank(today)),
            RecordKind::Recruiter => Self::Recruiter(RecruiterDraft::blank(today)),
            RecordKind::Question => Self::Question(QuestionDraft::blank()),
            RecordKind::Company => Self::Company(CompanyDraft::blank()),
            RecordKind::Package => Self::Package(PackageDraft::blank()),
            RecordKind::Payment => Self::Payment(PaymentDraft::blank(today)),
            RecordKind::Report => Self::Report(ReportDraft::blank(today)),
        }
    }
}

impl FormFields for FormPayload {
    fn fields(&self) -> &'static [FieldSpec] {
        with_draft!(self, draft => draft.fields())
    }

    fn field_text(&self, index: usize) -> String {
        with_draft!(self, draft => draft.field_text(index))
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        with_draft!(self, draft => draft.set_field_text(index, value))
    }

    fn cycle_field(&mut self, index: usize) {
        with_draft!(self, draft => draft.cycle_field(index))
    }
}

/// Conversion between a typed draft and the kind-erased payload.
pub trait DraftPayload: Sized {
    fn into_payload(self) -> FormPayload;
    fn from_payload(payload: FormPayload) -> Option<Self>;
}

macro_rules! draft_payload {
    ($($draft:ident => $variant:ident),+ $(,)?) => {
        $(
            impl DraftPayload for $draft {
                fn into_payload(self) -> FormPayload {
                    FormPayload::$variant(self)
                }

                fn from_payload(payload: FormPayload) -> Option<Self> {
                    match payload {
                        FormPayload::$variant(draft) => Some(draft),
                        _ => None,
                    }
                }
            }
        )+
    };
}

draft_payload!(
    UserDraft => User,
    RecruiterDraft => Recruiter,
    QuestionDraft => Question,
    CompanyDraft => Company,
    PackageDraft => Package,
    PaymentDraft => Payment,
    ReportDraft => Report,
);
