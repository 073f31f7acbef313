// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use questadmin_app::{ActionState, SystemSettings, ValidationError};
use tracing::{info, warn};

/// Saved system configuration plus the draft being edited.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsStore {
    saved: SystemSettings,
    draft: SystemSettings,
    action: ActionState,
}

impl SettingsStore {
    pub fn new(saved: SystemSettings) -> Self {
        Self {
            draft: saved.clone(),
            saved,
            action: ActionState::Idle,
        }
    }

    pub fn saved(&self) -> &SystemSettings {
        &self.saved
    }

    pub fn draft(&self) -> &SystemSettings {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut SystemSettings {
        &mut self.draft
    }

    pub fn action(&self) -> &ActionState {
        &self.action
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    /// Commits the draft when it validates. A rejected draft stays in place
    /// for correction and the saved settings are untouched.
    pub fn save(&mut self) -> Result<(), ValidationError> {
        self.action = ActionState::Pending;
        match self.draft.validate() {
            Ok(()) => {
                let trimmed = self.draft.general.system_name.trim().to_owned();
                self.draft.general.system_name = trimmed;
                self.saved = self.draft.clone();
                self.action = ActionState::Succeeded("settings saved".to_owned());
                info!(system_name = %self.saved.general.system_name, "settings saved");
                Ok(())
            }
            Err(error) => {
                warn!(field = error.field(), %error, "settings rejected");
                self.action = ActionState::Failed(error.to_string());
                Err(error)
            }
        }
    }

    pub fn revert(&mut self) {
        self.draft = self.saved.clone();
        self.action = ActionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::SettingsStore;
    use questadmin_app::{ActionState, FormFields, SystemSettings, ValidationError};

    #[test]
    fn save_commits_a_valid_draft() {
        let mut store = SettingsStore::default();
        store.draft_mut().general.system_name = "QuestTalk".to_owned();
        assert!(store.is_dirty());
        assert!(store.save().is_ok());
        assert_eq!(store.saved().general.system_name, "QuestTalk");
        assert!(!store.is_dirty());
        assert_eq!(store.action().message(), Some("settings saved"));
    }

    #[test]
    fn save_trims_the_system_name() {
        let mut store = SettingsStore::default();
        store.draft_mut().general.system_name = "  QuestTalk  ".to_owned();
        assert!(store.save().is_ok());
        assert_eq!(store.saved().general.system_name, "QuestTalk");
        assert!(!store.is_dirty());
    }

    #[test]
    fn rejected_draft_keeps_saved_settings() {
        let mut store = SettingsStore::new(SystemSettings::default());
        store.draft_mut().security.password_min_length = 4;
        let err = store.save().expect_err("short passwords rejected");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(store.saved().security.password_min_length, 8);
        assert!(matches!(store.action(), ActionState::Failed(_)));
        assert!(store.is_dirty());
    }

    #[test]
    fn revert_discards_edits() {
        let mut store = SettingsStore::default();
        let original = store.draft().field_text(0);
        store
            .draft_mut()
            .set_field_text(0, "Scratch")
            .expect("text field accepts input");
        store.revert();
        assert_eq!(store.draft().field_text(0), original);
        assert_eq!(store.action(), &ActionState::Idle);
    }
}
