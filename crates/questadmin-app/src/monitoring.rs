// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::model::labeled_enum;

labeled_enum!(TimeRange {
    Day => "24h",
    Week => "7d",
    Month => "30d",
});

impl TimeRange {
    pub const fn days(self) -> u64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}

labeled_enum!(AlertLevel {
    Error => "error",
    Warning => "warning",
    Info => "info",
});

labeled_enum!(ActivityType {
    Interview => "Interview",
    Cv => "CV",
    Qa => "Q&A",
    Practice => "Practice",
});

labeled_enum!(ActivityStatus {
    Success => "success",
    Warning => "warning",
    Failed => "failed",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub name: String,
    pub requests: u64,
    pub avg_latency_ms: u64,
    /// Hundredths of a percent: 9620 is 96.20%.
    pub accuracy_bp: u64,
    pub cost_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemAlert {
    pub level: AlertLevel,
    pub title: String,
    pub detail: String,
    pub age: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiActivity {
    pub activity_type: ActivityType,
    pub user: String,
    pub prompt: String,
    pub status: ActivityStatus,
    pub latency_ms: Option<u64>,
    pub accuracy_pct: Option<u64>,
    pub age: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MonitoringSummary {
    pub total_requests: u64,
    pub avg_latency_ms: u64,
    pub accuracy_bp: u64,
    pub cost_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    pub range: TimeRange,
    pub models: Vec<ModelUsage>,
    pub alerts: Vec<SystemAlert>,
    pub activities: Vec<AiActivity>,
}

impl MonitoringSnapshot {
    /// Totals across models; latency and accuracy are weighted by request
    /// count.
    pub fn summary(&self) -> MonitoringSummary {
        let total_requests: u64 = self.models.iter().map(|model| model.requests).sum();
        let cost_cents = self.models.iter().map(|model| model.cost_cents).sum();
        if total_requests == 0 {
            return MonitoringSummary {
                cost_cents,
                ..MonitoringSummary::default()
            };
        }
        let weighted = |metric: fn(&ModelUsage) -> u64| {
            let sum: u64 = self
                .models
                .iter()
                .map(|model| model.requests * metric(model))
                .sum();
            sum / total_requests
        };
        MonitoringSummary {
            total_requests,
            avg_latency_ms: weighted(|model| model.avg_latency_ms),
            accuracy_bp: weighted(|model| model.accuracy_bp),
            cost_cents,
        }
    }
}

pub fn format_latency(ms: u64) -> String {
    format!("{}.{}s", ms / 1000, (ms % 1000) / 100)
}

pub fn format_basis_points(bp: u64) -> String {
    let tenths = (bp + 5) / 10;
    format!("{}.{}%", tenths / 10, tenths % 10)
}

pub fn format_usd_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
