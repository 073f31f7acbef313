// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use questadmin_app::{
    CompanyDraft, CompanySize, CompanyStatus, Difficulty, Labeled, PackageDraft, PackageTheme,
    PaymentDraft, PaymentMethod, PaymentStatus, QuestionCategory, QuestionDraft, RecruiterDraft,
    RecruiterStatus, ReportDraft, ReportStatus, ReportType, UserDraft, UserPlan, UserStatus,
    format_date,
};
use std::path::PathBuf;
use time::{Date, Duration, Month};

const FIRST_NAMES: [&str; 16] = [
    "An", "Binh", "Chi", "Dung", "Giang", "Hoa", "Khanh", "Linh", "Minh", "Nam", "Phuong",
    "Quang", "Thao", "Trung", "Vy", "Yen",
];
const LAST_NAMES: [&str; 12] = [
    "Nguyen", "Tran", "Le", "Pham", "Hoang", "Vu", "Dang", "Bui", "Do", "Ho", "Ngo", "Duong",
];
const EMAIL_DOMAINS: [&str; 5] = [
    "example.com",
    "mail.test",
    "interview.dev",
    "candidates.io",
    "practice.org",
];

const COMPANY_PREFIXES: [&str; 10] = [
    "Saigon", "Hanoi", "Mekong", "Lotus", "Bamboo", "Delta", "Pacific", "Nova", "Vertex", "Orbit",
];
const COMPANY_SUFFIXES: [&str; 6] = ["Tech", "Digital", "Labs", "Group", "Software", "Systems"];
const INDUSTRIES: [&str; 8] = [
    "Technology",
    "Finance",
    "E-commerce",
    "Telecommunications",
    "Education",
    "Healthcare",
    "Logistics",
    "Consulting",
];

const QUESTION_STEMS: [&str; 10] = [
    "Explain how you would",
    "Describe a time you had to",
    "Walk me through how to",
    "What trade-offs matter when you",
    "How do you",
    "Tell me how your team would",
    "Why would you",
    "Sketch a plan to",
    "Compare two ways to",
    "What goes wrong when you",
];
const QUESTION_TOPICS: [&str; 10] = [
    "design a rate limiter",
    "resolve a conflict with a teammate",
    "debug a slow database query",
    "prioritize a crowded backlog",
    "review a pull request",
    "cache an expensive API call",
    "onboard onto a legacy codebase",
    "estimate a new feature",
    "handle a production outage",
    "give feedback to a peer",
];

const PACKAGE_NAMES: [&str; 6] = ["Starter", "Basic", "Plus", "Pro", "Premium", "Enterprise"];
const FEATURE_LABELS: [&str; 8] = [
    "5 interviews",
    "Unlimited interviews",
    "AI analysis",
    "Video review",
    "Email support",
    "CV scoring",
    "Mock panels",
    "Priority support",
];

const REPORT_SUBJECTS: [&str; 6] = [
    "Monthly signups",
    "Revenue summary",
    "AI accuracy",
    "Interview volume",
    "Churn analysis",
    "Question usage",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of valid form drafts for every record kind.
#[derive(Debug, Clone)]
pub struct AdminFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl AdminFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn full_name(&mut self) -> String {
        let last = self.pick(&LAST_NAMES);
        let first = self.pick(&FIRST_NAMES);
        format!("{last} {first}")
    }

    pub fn email_for(&mut self, name: &str) -> String {
        let local: String = name
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(".");
        let domain = self.pick(&EMAIL_DOMAINS);
        format!("{local}{}@{domain}", self.int_range_i64(1, 99))
    }

    pub fn phone(&mut self) -> String {
        format!(
            "09{:02} {:03} {:03}",
            self.int_range_i64(0, 99),
            self.int_range_i64(0, 999),
            self.int_range_i64(0, 999),
        )
    }

    pub fn date(&mut self) -> Date {
        let start = fixture_date() - Duration::days(365);
        start + Duration::days(self.int_range_i64(0, 365))
    }

    pub fn user_draft(&mut self) -> UserDraft {
        let full_name = self.full_name();
        UserDraft {
            email: self.email_for(&full_name),
            full_name,
            plan: self.pick_value(),
            status: self.pick_value::<UserStatus>(),
            interviews: self.int_range_i64(0, 60).to_string(),
            joined_at: format_date(self.date()),
        }
    }

    pub fn recruiter_draft(&mut self) -> RecruiterDraft {
        let company_name = self.company_name();
        RecruiterDraft {
            email: format!(
                "hr@{}.vn",
                company_name.to_ascii_lowercase().replace(' ', "")
            ),
            company_name,
            phone: self.phone(),
            candidates: self.int_range_i64(0, 500).to_string(),
            status: self.pick_value::<RecruiterStatus>(),
            joined_at: format_date(self.date()),
        }
    }

    pub fn question_draft(&mut self) -> QuestionDraft {
        QuestionDraft {
            text: format!(
                "{} {}?",
                self.pick(&QUESTION_STEMS),
                self.pick(&QUESTION_TOPICS)
            ),
            category: self.pick_value::<QuestionCategory>(),
            difficulty: self.pick_value::<Difficulty>(),
            used_count: self.int_range_i64(0, 2_000).to_string(),
            ai_score: self.int_range_i64(60, 100).to_string(),
        }
    }

    pub fn company_draft(&mut self) -> CompanyDraft {
        CompanyDraft {
            name: self.company_name(),
            industry: self.pick(&INDUSTRIES).to_owned(),
            size: self.pick_value::<CompanySize>(),
            interviews: self.int_range_i64(0, 5_000).to_string(),
            status: self.pick_value::<CompanyStatus>(),
        }
    }

    pub fn package_draft(&mut self) -> PackageDraft {
        let mut draft = PackageDraft::blank();
        draft.code_name = self.pick(&PACKAGE_NAMES).to_owned();
        draft.subtitle = format!("{} months", self.int_range_i64(1, 12));
        draft.price_vnd = (self.int_range_i64(0, 20) * 50_000).to_string();
        draft.subscribers = self.int_range_i64(0, 2_000).to_string();
        draft.theme = self.pick_value::<PackageTheme>();
        for feature in &mut draft.features {
            feature.label = self.pick(&FEATURE_LABELS).to_owned();
            feature.enabled = self.rng.bool();
        }
        draft
    }

    pub fn payment_draft(&mut self) -> PaymentDraft {
        let payer_name = self.full_name();
        PaymentDraft {
            email: self.email_for(&payer_name),
            payer_name,
            package_name: self.pick(&PACKAGE_NAMES).to_owned(),
            amount_vnd: (self.int_range_i64(1, 12) * 99_000).to_string(),
            method: self.pick_value::<PaymentMethod>(),
            status: self.pick_value::<PaymentStatus>(),
            paid_on: format_date(self.date()),
            transaction_code: format!("TXN{:08}", self.int_range_i64(0, 99_999_999)),
            phone: self.phone(),
        }
    }

    pub fn report_draft(&mut self) -> ReportDraft {
        let month = self.int_range_i64(1, 12);
        ReportDraft {
            name: format!("{} {month:02}/{REFERENCE_YEAR}", self.pick(&REPORT_SUBJECTS)),
            report_type: self.pick_value::<ReportType>(),
            status: self.pick_value::<ReportStatus>(),
            downloads: self.int_range_i64(0, 300).to_string(),
            size_label: format!("{}.{} MB", self.int_range_i64(0, 9), self.int_range_i64(0, 9)),
            created_on: format_date(self.date()),
        }
    }

    fn company_name(&mut self) -> String {
        format!(
            "{} {}",
            self.pick(&COMPANY_PREFIXES),
            self.pick(&COMPANY_SUFFIXES)
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn pick_value<T: Labeled>(&mut self) -> T {
        let all = T::all();
        all[self.rng.int_n(all.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// The "today" used by fixtures.
pub fn fixture_date() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR, Month::February, 19).unwrap_or(Date::MIN)
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

#[cfg(test)]
mod tests {
    use super::{AdminFaker, fixture_date};
    use questadmin_app::{
        Company, ManagedRecord, Package, Payment, Question, RecordId, Recruiter, Report, User,
    };
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = AdminFaker::new(42);
        let mut right = AdminFaker::new(42);
        assert_eq!(left.user_draft(), right.user_draft());
        assert_eq!(AdminFaker::new(0).seed(), 1);
    }

    #[test]
    fn every_draft_validates() {
        let mut faker = AdminFaker::new(7);
        for _ in 0..25 {
            let id = RecordId::from("x_1");
            assert!(User::from_draft(id.clone(), &faker.user_draft()).is_ok());
            assert!(Recruiter::from_draft(id.clone(), &faker.recruiter_draft()).is_ok());
            assert!(Question::from_draft(id.clone(), &faker.question_draft()).is_ok());
            assert!(Company::from_draft(id.clone(), &faker.company_draft()).is_ok());
            assert!(Package::from_draft(id.clone(), &faker.package_draft()).is_ok());
            assert!(Payment::from_draft(id.clone(), &faker.payment_draft()).is_ok());
            assert!(Report::from_draft(id, &faker.report_draft()).is_ok());
        }
    }

    #[test]
    fn dates_stay_within_the_year_before_fixture_date() {
        let mut faker = AdminFaker::new(3);
        for _ in 0..50 {
            let date = faker.date();
            assert!(date <= fixture_date());
            assert!(date >= fixture_date() - time::Duration::days(365));
        }
    }

    #[test]
    fn variety_across_seeds() {
        let names: BTreeSet<String> = (1..20_u64)
            .map(|seed| AdminFaker::new(seed).full_name())
            .collect();
        assert!(names.len() > 5, "expected varied names, got {names:?}");
    }
}
