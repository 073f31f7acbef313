// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod auth;
pub mod dialog;
pub mod forms;
pub mod ids;
pub mod model;
pub mod monitoring;
pub mod query;
pub mod record;
pub mod settings;
pub mod state;
pub mod validation;

pub use auth::*;
pub use dialog::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use monitoring::*;
pub use query::*;
pub use record::*;
pub use settings::*;
pub use state::*;
pub use validation::*;
