// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::RecordId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// A draft plus the record it edits, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState<D> {
    pub mode: FormMode,
    pub draft: D,
}

impl<D> FormState<D> {
    pub fn create(draft: D) -> Self {
        Self {
            mode: FormMode::Create,
            draft,
        }
    }

    pub fn edit(id: RecordId, draft: D) -> Self {
        Self {
            mode: FormMode::Edit(id),
            draft,
        }
    }

    pub fn editing(&self) -> Option<&RecordId> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }

    pub fn map<E>(self, f: impl FnOnce(D) -> E) -> FormState<E> {
        FormState {
            mode: self.mode,
            draft: f(self.draft),
        }
    }
}

/// Closed -> Open -> Closed. A failed submit stays open with its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDialog<D> {
    Closed,
    Open {
        form: FormState<D>,
        error: Option<String>,
    },
}

impl<D> Default for FormDialog<D> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<D> FormDialog<D> {
    pub fn open(&mut self, form: FormState<D>) {
        *self = Self::Open { form, error: None };
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn form(&self) -> Option<&FormState<D>> {
        match self {
            Self::Open { form, .. } => Some(form),
            Self::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState<D>> {
        match self {
            Self::Open { form, .. } => Some(form),
            Self::Closed => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Open { error, .. } => error.as_deref(),
            Self::Closed => None,
        }
    }

    /// Records a rejected submit; the draft is kept for correction.
    pub fn fail(&mut self, message: impl Into<String>) {
        if let Self::Open { error, .. } = self {
            *error = Some(message.into());
        }
    }

    pub fn close(&mut self) -> Option<FormState<D>> {
        match std::mem::replace(self, Self::Closed) {
            Self::Open { form, .. } => Some(form),
            Self::Closed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub id: RecordId,
    pub label: String,
}

/// Idle -> Pending -> Idle, either confirmed or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteDialog {
    #[default]
    Idle,
    Pending(ConfirmState),
}

impl DeleteDialog {
    pub fn request(&mut self, confirm: ConfirmState) {
        *self = Self::Pending(confirm);
    }

    pub fn pending(&self) -> Option<&ConfirmState> {
        match self {
            Self::Pending(confirm) => Some(confirm),
            Self::Idle => None,
        }
    }

    pub fn confirm(&mut self) -> Option<ConfirmState> {
        match std::mem::take(self) {
            Self::Pending(confirm) => Some(confirm),
            Self::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfirmState, DeleteDialog, FormDialog, FormMode, FormState};
    use crate::ids::RecordId;

    #[test]
    fn failed_submit_keeps_dialog_open_with_draft() {
        let mut dialog = FormDialog::default();
        dialog.open(FormState::create("draft".to_owned()));
        dialog.fail("name is required");
        assert!(dialog.is_open());
        assert_eq!(dialog.error(), Some("name is required"));
        assert_eq!(dialog.form().map(|form| form.draft.as_str()), Some("draft"));

        let closed = dialog.close();
        assert_eq!(closed.map(|form| form.mode), Some(FormMode::Create));
        assert!(!dialog.is_open());
        assert_eq!(dialog.error(), None);
    }

    #[test]
    fn reopening_clears_previous_error() {
        let mut dialog = FormDialog::default();
        dialog.open(FormState::create(1));
        dialog.fail("bad");
        dialog.open(FormState::edit(RecordId::from("u_1"), 2));
        assert_eq!(dialog.error(), None);
        assert_eq!(
            dialog.form().and_then(FormState::editing),
            Some(&RecordId::from("u_1"))
        );
    }

    #[test]
    fn fail_on_closed_dialog_is_ignored() {
        let mut dialog = FormDialog::<u8>::Closed;
        dialog.fail("ignored");
        assert_eq!(dialog, FormDialog::Closed);
    }

    #[test]
    fn delete_dialog_confirms_once() {
        let mut dialog = DeleteDialog::default();
        assert_eq!(dialog.confirm(), None);

        let target = ConfirmState {
            id: RecordId::from("u_2"),
            label: "Ana".to_owned(),
        };
        dialog.request(target.clone());
        assert_eq!(dialog.pending(), Some(&target));
        assert_eq!(dialog.confirm(), Some(target));
        assert_eq!(dialog, DeleteDialog::Idle);

        dialog.request(ConfirmState {
            id: RecordId::from("u_3"),
            label: "Bao".to_owned(),
        });
        dialog.cancel();
        assert_eq!(dialog.pending(), None);
    }
}
