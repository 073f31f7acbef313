// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::forms::{FieldInput, FieldSpec, FormFields};
use crate::model::{Labeled, labeled_enum};
use crate::validation::{
    ValidationError, ValidationResult, ensure_range, is_http_url, parse_decimal, parse_number,
    required_email, required_text,
};

labeled_enum!(Timezone {
    Gmt7 => "GMT+7",
    Gmt0 => "GMT+0",
    GmtMinus5 => "GMT-5",
});

labeled_enum!(Language {
    Vi => "vi",
    En => "en",
});

labeled_enum!(EmailProvider {
    Smtp => "smtp",
    SendGrid => "sendgrid",
    Ses => "ses",
});

labeled_enum!(Currency {
    Vnd => "VND",
    Usd => "USD",
});

labeled_enum!(AiProvider {
    OpenAi => "openai",
    Anthropic => "anthropic",
    Google => "google",
});

labeled_enum!(BackupFrequency {
    Hourly => "hourly",
    Daily => "daily",
    Weekly => "weekly",
});

labeled_enum!(BackupDestination {
    Cloud => "cloud",
    Local => "local",
});

labeled_enum!(SettingsSection {
    General => "General",
    Security => "Security",
    Email => "Email",
    Payment => "Payment",
    Ai => "AI",
    Backup => "Backup",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub system_name: String,
    pub description: String,
    pub timezone: Timezone,
    pub language: Language,
    pub maintenance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub require_2fa: bool,
    pub session_timeout_min: i64,
    pub max_login_attempts: i64,
    pub password_min_length: i64,
    pub password_require_special: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSettings {
    pub provider: EmailProvider,
    pub smtp_host: String,
    pub smtp_port: i64,
    pub smtp_user: String,
    pub smtp_password: String,
    pub from_name: String,
    pub from_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    pub currency: Currency,
    pub momo_enabled: bool,
    pub vnpay_enabled: bool,
    pub banking_enabled: bool,
    pub webhook_url: String,
    pub invoice_prefix: String,
}

impl PaymentSettings {
    pub fn any_enabled(&self) -> bool {
        self.momo_enabled || self.vnpay_enabled || self.banking_enabled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    pub provider: AiProvider,
    pub api_key: String,
    pub default_model: String,
    pub temperature: f64,
    pub max_tokens: i64,
    pub daily_limit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSettings {
    pub auto_backup: bool,
    pub frequency: BackupFrequency,
    pub retention_days: i64,
    pub destination: BackupDestination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub general: GeneralSettings,
    pub security: SecuritySettings,
    pub email: EmailSettings,
    pub payment: PaymentSettings,
    pub ai: AiSettings,
    pub backup: BackupSettings,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            general: GeneralSettings {
                system_name: "AIQuestTalk Platform".to_owned(),
                description: "AI-powered interview practice platform".to_owned(),
                timezone: Timezone::Gmt7,
                language: Language::Vi,
                maintenance: false,
            },
            security: SecuritySettings {
                require_2fa: false,
                session_timeout_min: 60,
                max_login_attempts: 10,
                password_min_length: 8,
                password_require_special: true,
            },
            email: EmailSettings {
                provider: EmailProvider::Smtp,
                smtp_host: "smtp.gmail.com".to_owned(),
                smtp_port: 587,
                smtp_user: String::new(),
                smtp_password: String::new(),
                from_name: "AIQuestTalk".to_owned(),
                from_email: "no-reply@aiquesttalk.com".to_owned(),
            },
            payment: PaymentSettings {
                currency: Currency::Vnd,
                momo_enabled: true,
                vnpay_enabled: true,
                banking_enabled: true,
                webhook_url: "https://your-domain.com/api/payments/webhook".to_owned(),
                invoice_prefix: "AQT-".to_owned(),
            },
            ai: AiSettings {
                provider: AiProvider::OpenAi,
                api_key: String::new(),
                default_model: "gpt-4o-mini".to_owned(),
                temperature: 0.7,
                max_tokens: 2048,
                daily_limit: 10000,
            },
            backup: BackupSettings {
                auto_backup: true,
                frequency: BackupFrequency::Daily,
                retention_days: 14,
                destination: BackupDestination::Cloud,
            },
        }
    }
}

const fn field(label: &'static str, input: FieldInput) -> FieldSpec {
    FieldSpec { label, input }
}

const SETTINGS_FIELDS: &[FieldSpec] = &[
    field("System name", FieldInput::Text),
    field("Description", FieldInput::Text),
    field("Timezone", FieldInput::Choice),
    field("Language", FieldInput::Choice),
    field("Maintenance mode", FieldInput::Toggle),
    field("Require 2FA", FieldInput::Toggle),
    field("Session timeout (min)", FieldInput::Number),
    field("Max login attempts", FieldInput::Number),
    field("Password min length", FieldInput::Number),
    field("Require special char", FieldInput::Toggle),
    field("Email provider", FieldInput::Choice),
    field("SMTP host", FieldInput::Text),
    field("SMTP port", FieldInput::Number),
    field("SMTP user", FieldInput::Text),
    field("SMTP password", FieldInput::Text),
    field("From name", FieldInput::Text),
    field("From email", FieldInput::Text),
    field("Currency", FieldInput::Choice),
    field("Momo", FieldInput::Toggle),
    field("VNPay", FieldInput::Toggle),
    field("Bank transfer", FieldInput::Toggle),
    field("Webhook URL", FieldInput::Text),
    field("Invoice prefix", FieldInput::Text),
    field("AI provider", FieldInput::Choice),
    field("API key", FieldInput::Text),
    field("Default model", FieldInput::Text),
    field("Temperature", FieldInput::Number),
    field("Max tokens", FieldInput::Number),
    field("Daily request limit", FieldInput::Number),
    field("Automatic backup", FieldInput::Toggle),
    field("Backup frequency", FieldInput::Choice),
    field("Retention (days)", FieldInput::Number),
    field("Backup destination", FieldInput::Choice),
];

/// First field index of each section, in order.
const SECTION_STARTS: [(SettingsSection, usize); 6] = [
    (SettingsSection::General, 0),
    (SettingsSection::Security, 5),
    (SettingsSection::Email, 10),
    (SettingsSection::Payment, 17),
    (SettingsSection::Ai, 23),
    (SettingsSection::Backup, 29),
];

pub fn settings_section_of(index: usize) -> SettingsSection {
    SECTION_STARTS
        .iter()
        .rev()
        .find(|(_, start)| index >= *start)
        .map_or(SettingsSection::General, |(section, _)| *section)
}

pub fn settings_section_start(section: SettingsSection) -> usize {
    SECTION_STARTS
        .iter()
        .find(|(candidate, _)| *candidate == section)
        .map_or(0, |(_, start)| *start)
}

fn flag(value: bool) -> String {
    let label = if value { "on" } else { "off" };
    label.to_owned()
}

impl SystemSettings {
    pub fn validate(&self) -> ValidationResult<()> {
        required_text("system name", &self.general.system_name)?;
        ensure_range("session timeout", self.security.session_timeout_min, 1, i64::MAX)?;
        ensure_range("max login attempts", self.security.max_login_attempts, 1, i64::MAX)?;
        ensure_range("password min length", self.security.password_min_length, 6, 64)?;
        ensure_range("SMTP port", self.email.smtp_port, 1, 65535)?;
        required_email("from email", &self.email.from_email)?;
        if self.payment.any_enabled() && !is_http_url(&self.payment.webhook_url) {
            return Err(ValidationError::InvalidUrl {
                field: "webhook URL",
            });
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(ValidationError::OutOfRange {
                field: "temperature",
                min: 0,
                max: 2,
            });
        }
        ensure_range("max tokens", self.ai.max_tokens, 1, i64::MAX)?;
        ensure_range("daily limit", self.ai.daily_limit, 0, i64::MAX)?;
        ensure_range("retention days", self.backup.retention_days, 1, i64::MAX)?;
        Ok(())
    }
}

impl FormFields for SystemSettings {
    fn fields(&self) -> &'static [FieldSpec] {
        SETTINGS_FIELDS
    }

    fn field_text(&self, index: usize) -> String {
        let general = &self.general;
        let security = &self.security;
        let email = &self.email;
        let payment = &self.payment;
        let ai = &self.ai;
        let backup = &self.backup;
        match index {
            0 => general.system_name.clone(),
            1 => general.description.clone(),
            2 => general.timezone.label().to_owned(),
            3 => general.language.label().to_owned(),
            4 => flag(general.maintenance),
            5 => flag(security.require_2fa),
            6 => security.session_timeout_min.to_string(),
            7 => security.max_login_attempts.to_string(),
            8 => security.password_min_length.to_string(),
            9 => flag(security.password_require_special),
            10 => email.provider.label().to_owned(),
            11 => email.smtp_host.clone(),
            12 => email.smtp_port.to_string(),
            13 => email.smtp_user.clone(),
            14 => email.smtp_password.clone(),
            15 => email.from_name.clone(),
            16 => email.from_email.clone(),
            17 => payment.currency.label().to_owned(),
            18 => flag(payment.momo_enabled),
            19 => flag(payment.vnpay_enabled),
            20 => flag(payment.banking_enabled),
            21 => payment.webhook_url.clone(),
            22 => payment.invoice_prefix.clone(),
            23 => ai.provider.label().to_owned(),
            24 => ai.api_key.clone(),
            25 => ai.default_model.clone(),
            26 => ai.temperature.to_string(),
            27 => ai.max_tokens.to_string(),
            28 => ai.daily_limit.to_string(),
            29 => flag(backup.auto_backup),
            30 => backup.frequency.label().to_owned(),
            31 => backup.retention_days.to_string(),
            32 => backup.destination.label().to_owned(),
            _ => String::new(),
        }
    }

    fn set_field_text(&mut self, index: usize, value: &str) -> ValidationResult<()> {
        let label = SETTINGS_FIELDS
            .get(index)
            .map_or("setting", |entry| entry.label);
        match index {
            0 => self.general.system_name = value.trim().to_owned(),
            1 => self.general.description = value.to_owned(),
            6 => self.security.session_timeout_min = parse_number(label, value)?,
            7 => self.security.max_login_attempts = parse_number(label, value)?,
            8 => self.security.password_min_length = parse_number(label, value)?,
            11 => self.email.smtp_host = value.to_owned(),
            12 => self.email.smtp_port = parse_number(label, value)?,
            13 => self.email.smtp_user = value.to_owned(),
            14 => self.email.smtp_password = value.to_owned(),
            15 => self.email.from_name = value.to_owned(),
            16 => self.email.from_email = value.to_owned(),
            21 => self.payment.webhook_url = value.to_owned(),
            22 => self.payment.invoice_prefix = value.to_owned(),
            24 => self.ai.api_key = value.to_owned(),
            25 => self.ai.default_model = value.to_owned(),
            26 => self.ai.temperature = parse_decimal(label, value)?,
            27 => self.ai.max_tokens = parse_number(label, value)?,
            28 => self.ai.daily_limit = parse_number(label, value)?,
            31 => self.backup.retention_days = parse_number(label, value)?,
            _ => {}
        }
        Ok(())
    }

    fn cycle_field(&mut self, index: usize) {
        match index {
            2 => self.general.timezone = self.general.timezone.next(),
            3 => self.general.language = self.general.language.next(),
            4 => self.general.maintenance = !self.general.maintenance,
            5 => self.security.require_2fa = !self.security.require_2fa,
            9 => {
                self.security.password_require_special = !self.security.password_require_special
            }
            10 => self.email.provider = self.email.provider.next(),
            17 => self.payment.currency = self.payment.currency.next(),
            18 => self.payment.momo_enabled = !self.payment.momo_enabled,
            19 => self.payment.vnpay_enabled = !self.payment.vnpay_enabled,
            20 => self.payment.banking_enabled = !self.payment.banking_enabled,
            23 => self.ai.provider = self.ai.provider.next(),
            29 => self.backup.auto_backup = !self.backup.auto_backup,
            30 => self.backup.frequency = self.backup.frequency.next(),
            32 => self.backup.destination = self.backup.destination.next(),
            _ => {}
        }
    }
}
