// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Fixed demo collections loaded by `AdminStore::demo`.

use anyhow::{Context, Result};
use questadmin_app::{
    ActivityStatus, ActivityType, AiActivity, AlertLevel, Company, CompanySize, CompanyStatus,
    Difficulty, ModelUsage, MonitoringSnapshot, Package, PackageFeature, PackageTheme, Payment,
    PaymentMethod, PaymentStatus, Question, QuestionCategory, RecordId, Recruiter,
    RecruiterStatus, Report, ReportStatus, ReportType, SystemAlert, TimeRange, User, UserPlan,
    UserStatus, parse_date,
};
use time::Date;

fn day(raw: &str) -> Result<Date> {
    parse_date("seed date", raw).with_context(|| format!("parse seed date {raw}"))
}

pub fn demo_users() -> Result<Vec<User>> {
    let rows = [
        ("u1", "Nguyễn Văn A", "nguyenvana@email.com", UserPlan::Premium, UserStatus::Active, 24, "2024-01-15"),
        ("u2", "Trần Thị B", "tranthib@email.com", UserPlan::Free, UserStatus::Active, 8, "2024-01-20"),
        ("u3", "Lê Văn C", "levanc@email.com", UserPlan::Premium, UserStatus::Inactive, 45, "2024-01-10"),
        ("u4", "Phạm Thị D", "phamthid@email.com", UserPlan::Free, UserStatus::Active, 3, "2024-01-25"),
        ("u5", "Hoàng Văn E", "hoangvane@email.com", UserPlan::Premium, UserStatus::Active, 67, "2024-01-05"),
        ("u6", "Vũ Thị F", "vuthif@email.com", UserPlan::Free, UserStatus::Suspended, 12, "2024-01-18"),
    ];
    rows.into_iter()
        .map(|(id, name, email, plan, status, interviews, joined)| {
            Ok(User {
                id: RecordId::from(id),
                full_name: name.to_owned(),
                email: email.to_owned(),
                plan,
                status,
                interviews,
                joined_at: day(joined)?,
            })
        })
        .collect()
}

pub fn demo_recruiters() -> Result<Vec<Recruiter>> {
    let rows = [
        ("r1", "ABC Company", "hr@abc.com", "0901234567", 45, RecruiterStatus::Active, "2024-01-10"),
        ("r2", "XYZ Company", "recruit@xyz.com", "0912345678", 32, RecruiterStatus::Active, "2024-01-15"),
        ("r3", "Tech Solutions", "hr@tech.com", "0923456789", 78, RecruiterStatus::Active, "2024-01-05"),
        ("r4", "Digital Corp", "jobs@digital.com", "0934567890", 23, RecruiterStatus::Inactive, "2024-01-20"),
    ];
    rows.into_iter()
        .map(|(id, company, email, phone, candidates, status, joined)| {
            Ok(Recruiter {
                id: RecordId::from(id),
                company_name: company.to_owned(),
                email: email.to_owned(),
                phone: phone.to_owned(),
                candidates,
                status,
                joined_at: day(joined)?,
            })
        })
        .collect()
}

pub fn demo_questions() -> Vec<Question> {
    let rows = [
        ("q1", "Introduce yourself", QuestionCategory::General, Difficulty::Easy, 1247, 95),
        ("q2", "Experience working in a team", QuestionCategory::SoftSkills, Difficulty::Medium, 892, 92),
        ("q3", "Quicksort algorithm", QuestionCategory::Technical, Difficulty::Hard, 456, 88),
        ("q4", "Handling conflict within a team", QuestionCategory::SoftSkills, Difficulty::Medium, 734, 90),
        ("q5", "Designing a distributed system", QuestionCategory::Technical, Difficulty::Hard, 321, 85),
    ];
    rows.into_iter()
        .map(|(id, text, category, difficulty, used_count, ai_score)| Question {
            id: RecordId::from(id),
            text: text.to_owned(),
            category,
            difficulty,
            used_count,
            ai_score,
        })
        .collect()
}

pub fn demo_companies() -> Vec<Company> {
    let rows = [
        ("c1", "FPT Software", "IT", CompanySize::Over10k, 234, CompanyStatus::Active),
        ("c2", "Viettel Group", "Telecom", CompanySize::From5kTo10k, 189, CompanyStatus::Active),
        ("c3", "VinGroup", "Conglomerate", CompanySize::Over10k, 156, CompanyStatus::Active),
        ("c4", "Grab Vietnam", "Technology", CompanySize::From1kTo5k, 98, CompanyStatus::Inactive),
    ];
    rows.into_iter()
        .map(|(id, name, industry, size, interviews, status)| Company {
            id: RecordId::from(id),
            name: name.to_owned(),
            industry: industry.to_owned(),
            size,
            interviews,
            status,
        })
        .collect()
}

pub fn demo_packages() -> Vec<Package> {
    vec![
        Package {
            id: RecordId::from("free"),
            code_name: "Free".to_owned(),
            subtitle: "Lifetime".to_owned(),
            price_vnd: 0,
            subscribers: 1250,
            theme: PackageTheme::Gray,
            features: vec![
                PackageFeature::new("5 interviews", true),
                PackageFeature::new("AI analysis", false),
                PackageFeature::new("Video review", false),
                PackageFeature::new("Email support", true),
            ],
        },
        Package {
            id: RecordId::from("pro"),
            code_name: "Pro".to_owned(),
            subtitle: "1 month".to_owned(),
            price_vnd: 299_000,
            subscribers: 450,
            theme: PackageTheme::Blue,
            features: vec![
                PackageFeature::new("50 interviews", true),
                PackageFeature::new("AI analysis", true),
                PackageFeature::new("Video review", false),
                PackageFeature::new("Email & chat support", true),
            ],
        },
        Package {
            id: RecordId::from("premium"),
            code_name: "Premium".to_owned(),
            subtitle: "1 month".to_owned(),
            price_vnd: 599_000,
            subscribers: 180,
            theme: PackageTheme::Purple,
            features: vec![
                PackageFeature::new("Unlimited interviews", true),
                PackageFeature::new("AI analysis", true),
                PackageFeature::new("Video review", true),
                PackageFeature::new("24/7 priority support", true),
            ],
        },
    ]
}

pub fn demo_payments() -> Result<Vec<Payment>> {
    let rows = [
        ("pay1", "Nguyễn Văn A", "Premium Monthly", 299_000, PaymentMethod::Momo, PaymentStatus::Success, "2024-01-28", "TXN001234567", "nguyenvana@email.com", "0901234567"),
        ("pay2", "Trần Thị B", "Premium Yearly", 2_990_000, PaymentMethod::Banking, PaymentStatus::Success, "2024-01-27", "TXN001234568", "tranthib@email.com", "0912345678"),
        ("pay3", "Lê Văn C", "Premium Monthly", 299_000, PaymentMethod::VnPay, PaymentStatus::Pending, "2024-01-27", "TXN001234569", "levanc@email.com", "0923456789"),
        ("pay4", "Phạm Thị D", "Premium Monthly", 299_000, PaymentMethod::Momo, PaymentStatus::Failed, "2024-01-26", "TXN001234570", "phamthid@email.com", "0934567890"),
        ("pay5", "Hoàng Văn E", "Premium Yearly", 2_990_000, PaymentMethod::Banking, PaymentStatus::Success, "2024-01-26", "TXN001234571", "hoangvane@email.com", "0945678901"),
    ];
    rows.into_iter()
        .map(|(id, payer, package, amount, method, status, paid_on, code, email, phone)| {
            Ok(Payment {
                id: RecordId::from(id),
                payer_name: payer.to_owned(),
                package_name: package.to_owned(),
                amount_vnd: amount,
                method,
                status,
                paid_on: day(paid_on)?,
                transaction_code: code.to_owned(),
                email: email.to_owned(),
                phone: phone.to_owned(),
            })
        })
        .collect()
}

pub fn demo_reports() -> Result<Vec<Report>> {
    let rows = [
        ("rep1", "User report, January 2025", ReportType::Users, "2025-01-31", ReportStatus::Completed, 245, "2.4 MB"),
        ("rep2", "Revenue report Q4 2024", ReportType::Finance, "2024-12-31", ReportStatus::Completed, 189, "3.1 MB"),
        ("rep3", "AI performance report, December", ReportType::Ai, "2024-12-31", ReportStatus::Completed, 156, "1.8 MB"),
        ("rep4", "Interview report, week 4", ReportType::Interviews, "2025-01-28", ReportStatus::Processing, 0, "-"),
    ];
    rows.into_iter()
        .map(|(id, name, report_type, created, status, downloads, size)| {
            Ok(Report {
                id: RecordId::from(id),
                name: name.to_owned(),
                report_type,
                created_on: day(created)?,
                status,
                downloads,
                size_label: size.to_owned(),
            })
        })
        .collect()
}

/// Demo AI usage for `range`. Request counts and cost scale with the
/// number of days covered.
pub fn demo_monitoring(range: TimeRange) -> MonitoringSnapshot {
    let days = range.days();
    let model = |name: &str, requests: u64, latency: u64, accuracy: u64, cost: u64| ModelUsage {
        name: name.to_owned(),
        requests: requests * days,
        avg_latency_ms: latency,
        accuracy_bp: accuracy,
        cost_cents: cost * days,
    };
    let alert = |level: AlertLevel, title: &str, detail: &str, age: &str| SystemAlert {
        level,
        title: title.to_owned(),
        detail: detail.to_owned(),
        age: age.to_owned(),
    };
    let activity = |activity_type: ActivityType,
                    user: &str,
                    prompt: &str,
                    status: ActivityStatus,
                    latency_ms: Option<u64>,
                    accuracy_pct: Option<u64>,
                    age: &str| AiActivity {
        activity_type,
        user: user.to_owned(),
        prompt: prompt.to_owned(),
        status,
        latency_ms,
        accuracy_pct,
        age: age.to_owned(),
    };

    MonitoringSnapshot {
        range,
        models: vec![
            model("GPT-4", 8_234, 1_100, 9_620, 15_640),
            model("GPT-3.5 Turbo", 3_456, 800, 9_280, 4_520),
            model("Claude 3", 766, 1_300, 9_450, 3_290),
        ],
        alerts: vec![
            alert(AlertLevel::Error, "API timeout", "GPT-4 responses slower than 3s", "5 minutes ago"),
            alert(AlertLevel::Warning, "Cost warning", "API spend above 80% of budget", "15 minutes ago"),
            alert(AlertLevel::Info, "Notice", "Accuracy up 2.1% on last week", "1 hour ago"),
        ],
        activities: vec![
            activity(ActivityType::Interview, "Nguyễn Văn A", "Explain React hooks", ActivityStatus::Success, Some(1_100), Some(96), "2 minutes ago"),
            activity(ActivityType::Qa, "Trần Thị B", "Tailor a CV for a data analyst role", ActivityStatus::Warning, Some(2_400), Some(90), "12 minutes ago"),
            activity(ActivityType::Cv, "Lê Văn C", "Score a backend CV", ActivityStatus::Success, Some(900), Some(95), "32 minutes ago"),
            activity(ActivityType::Practice, "Phạm Thị D", "English mock interview", ActivityStatus::Failed, None, None, "1 hour ago"),
        ],
    }
}
