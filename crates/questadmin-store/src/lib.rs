// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod admin;
pub mod auth;
pub mod manager;
pub mod memory;
pub mod seed;
pub mod settings;

pub use admin::{AdminStore, MonitoringFeed};
pub use auth::{DEFAULT_ADMIN_PASSWORD, LocalAuthClient, password_digest};
pub use manager::{IdAllocator, RecordManager, RecordPage, SubmitError};
pub use memory::{MemoryStore, RecordStore};
pub use settings::SettingsStore;
