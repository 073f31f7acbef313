// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::RecordId;

pub const SITE_NAME: &str = "AIQuestTalk";

/// Closed set of values with a stable display label.
pub trait Labeled: Copy + PartialEq + 'static {
    fn all() -> &'static [Self];
    fn label(self) -> &'static str;

    fn next(self) -> Self {
        let all = Self::all();
        let index = all.iter().position(|value| *value == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }
}

macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl $crate::model::Labeled for $name {
            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn label(self) -> &'static str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use labeled_enum;

labeled_enum!(UserPlan {
    Premium => "Premium",
    Free => "Free",
});

labeled_enum!(UserStatus {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
});

labeled_enum!(RecruiterStatus {
    Active => "active",
    Inactive => "inactive",
});

labeled_enum!(QuestionCategory {
    General => "General",
    SoftSkills => "Soft Skills",
    Technical => "Technical",
});

labeled_enum!(Difficulty {
    Easy => "Easy",
    Medium => "Medium",
    Hard => "Hard",
});

labeled_enum!(CompanySize {
    Over10k => "10,000+",
    From5kTo10k => "5,000-10,000",
    From1kTo5k => "1,000-5,000",
    From100To1k => "100-1,000",
    Under100 => "<100",
});

labeled_enum!(CompanyStatus {
    Active => "active",
    Inactive => "inactive",
});

labeled_enum!(PackageTheme {
    Gray => "gray",
    Blue => "blue",
    Purple => "purple",
});

labeled_enum!(PaymentMethod {
    Momo => "Momo",
    Banking => "Banking",
    VnPay => "VNPay",
});

labeled_enum!(PaymentStatus {
    Success => "success",
    Pending => "pending",
    Failed => "failed",
});

labeled_enum!(ReportType {
    Users => "Users",
    Finance => "Finance",
    Ai => "AI",
    Interviews => "Interviews",
});

labeled_enum!(ReportStatus {
    Completed => "completed",
    Processing => "processing",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub full_name: String,
    pub email: String,
    pub plan: UserPlan,
    pub status: UserStatus,
    pub interviews: i64,
    pub joined_at: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recruiter {
    pub id: RecordId,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub candidates: i64,
    pub status: RecruiterStatus,
    pub joined_at: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: RecordId,
    pub text: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    pub used_count: i64,
    /// Percentage, 0 through 100.
    pub ai_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: RecordId,
    pub name: String,
    pub industry: String,
    pub size: CompanySize,
    pub interviews: i64,
    pub status: CompanyStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFeature {
    pub label: String,
    pub enabled: bool,
}

impl PackageFeature {
    pub fn new(label: &str, enabled: bool) -> Self {
        Self {
            label: label.to_owned(),
            enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: RecordId,
    pub code_name: String,
    pub subtitle: String,
    pub price_vnd: i64,
    pub subscribers: i64,
    pub theme: PackageTheme,
    pub features: Vec<PackageFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: RecordId,
    pub payer_name: String,
    pub package_name: String,
    pub amount_vnd: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_on: Date,
    pub transaction_code: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: RecordId,
    pub name: String,
    pub report_type: ReportType,
    pub created_on: Date,
    pub status: ReportStatus,
    pub downloads: i64,
    pub size_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    User,
    Recruiter,
    Question,
    Company,
    Package,
    Payment,
    Report,
}

impl RecordKind {
    pub const ALL: [Self; 7] = [
        Self::User,
        Self::Recruiter,
        Self::Question,
        Self::Company,
        Self::Package,
        Self::Payment,
        Self::Report,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Recruiter => "recruiter",
            Self::Question => "question",
            Self::Company => "company",
            Self::Package => "package",
            Self::Payment => "payment",
            Self::Report => "report",
        }
    }

    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::User => "u",
            Self::Recruiter => "r",
            Self::Question => "q",
            Self::Company => "c",
            Self::Package => "pkg",
            Self::Payment => "pay",
            Self::Report => "rep",
        }
    }

    pub const fn page(self) -> PageKind {
        match self {
            Self::User => PageKind::Users,
            Self::Recruiter => PageKind::Recruiters,
            Self::Question => PageKind::Questions,
            Self::Company => PageKind::Companies,
            Self::Package => PageKind::Packages,
            Self::Payment => PageKind::Payments,
            Self::Report => PageKind::Reports,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    Overview,
    Users,
    Recruiters,
    Questions,
    Companies,
    Packages,
    Payments,
    AiMonitoring,
    Reports,
    SystemSettings,
}

impl PageKind {
    pub const ALL: [Self; 10] = [
        Self::Overview,
        Self::Users,
        Self::Recruiters,
        Self::Questions,
        Self::Companies,
        Self::Packages,
        Self::Payments,
        Self::AiMonitoring,
        Self::Reports,
        Self::SystemSettings,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Users => "users",
            Self::Recruiters => "recruiters",
            Self::Questions => "questions",
            Self::Companies => "company",
            Self::Packages => "packages",
            Self::Payments => "payments",
            Self::AiMonitoring => "ai-monitoring",
            Self::Reports => "reports",
            Self::SystemSettings => "system-settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.key() == value)
    }

    /// Navigation title.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Dashboard",
            Self::Users => "Users",
            Self::Recruiters => "Recruiters",
            Self::Questions => "Questions",
            Self::Companies => "Companies",
            Self::Packages => "Packages",
            Self::Payments => "Payments",
            Self::AiMonitoring => "AI Monitoring",
            Self::Reports => "Reports",
            Self::SystemSettings => "System Settings",
        }
    }

    pub fn route(self) -> String {
        match self {
            Self::Overview => "/dashboard".to_owned(),
            other => format!("/dashboard/{}", other.key()),
        }
    }

    pub fn document_title(self) -> String {
        format!("{} | {SITE_NAME}", self.label())
    }

    pub const fn record_kind(self) -> Option<RecordKind> {
        match self {
            Self::Users => Some(RecordKind::User),
            Self::Recruiters => Some(RecordKind::Recruiter),
            Self::Questions => Some(RecordKind::Question),
            Self::Companies => Some(RecordKind::Company),
            Self::Packages => Some(RecordKind::Package),
            Self::Payments => Some(RecordKind::Payment),
            Self::Reports => Some(RecordKind::Report),
            Self::Overview | Self::AiMonitoring | Self::SystemSettings => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OverviewCounts {
    pub users: usize,
    pub active_users: usize,
    pub premium_users: usize,
    pub recruiters: usize,
    pub questions: usize,
    pub companies: usize,
    pub revenue_vnd: i64,
    pub pending_payments: usize,
    pub reports_processing: usize,
}

#[cfg(test)]
mod tests {
    use super::{CompanySize, Labeled, PageKind, QuestionCategory, RecordKind, UserStatus};

    #[test]
    fn labels_parse_back_to_variants() {
        for status in UserStatus::ALL {
            assert_eq!(UserStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(
            QuestionCategory::parse("Soft Skills"),
            Some(QuestionCategory::SoftSkills)
        );
        assert_eq!(CompanySize::parse("<100"), Some(CompanySize::Under100));
        assert_eq!(UserStatus::parse("banned"), None);
    }

    #[test]
    fn next_wraps_around() {
        assert_eq!(UserStatus::Active.next(), UserStatus::Inactive);
        assert_eq!(UserStatus::Suspended.next(), UserStatus::Active);
    }

    #[test]
    fn pages_expose_routes_and_titles() {
        assert_eq!(PageKind::Overview.route(), "/dashboard");
        assert_eq!(PageKind::AiMonitoring.route(), "/dashboard/ai-monitoring");
        assert_eq!(PageKind::Users.document_title(), "Users | AIQuestTalk");
        assert_eq!(PageKind::parse("company"), Some(PageKind::Companies));
        assert_eq!(PageKind::parse("nope"), None);
    }

    #[test]
    fn record_kinds_map_to_their_pages() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.page().record_kind(), Some(kind));
        }
        assert_eq!(PageKind::SystemSettings.record_kind(), None);
    }
}
