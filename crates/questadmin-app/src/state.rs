// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::auth::Session;
use crate::model::{Labeled, PageKind, RecordKind};
use crate::monitoring::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    SignIn,
    Nav,
    Search,
    Form(RecordKind),
    Detail(RecordKind),
    ConfirmDelete,
    Settings,
    Help,
}

/// Progress of an explicit action such as a settings save or a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

impl ActionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Succeeded(message) | Self::Failed(message) => Some(message),
            Self::Idle | Self::Pending => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_page: PageKind,
    pub session: Option<Session>,
    pub monitoring_range: TimeRange,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::SignIn,
            active_page: PageKind::Overview,
            session: None,
            monitoring_range: TimeRange::Day,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextPage,
    PrevPage,
    GoTo(PageKind),
    StartSearch,
    OpenForm(RecordKind),
    ShowDetail(RecordKind),
    RequestDelete,
    EditSettings,
    ShowHelp,
    ExitToNav,
    CycleRange,
    SignedIn(Session),
    SignOut,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    PageChanged(PageKind),
    RangeChanged(TimeRange),
    SessionStarted(String),
    SessionEnded,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn starting_at(page: PageKind) -> Self {
        Self {
            active_page: page,
            ..Self::default()
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SetStatus(message) => return vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                return vec![AppEvent::StatusCleared];
            }
            AppCommand::SignedIn(session) => {
                let email = session.email.clone();
                self.session = Some(session);
                self.mode = AppMode::Nav;
                return vec![
                    AppEvent::SessionStarted(email.clone()),
                    AppEvent::ModeChanged(self.mode),
                    self.set_status(&format!("signed in as {email}")),
                ];
            }
            _ if !self.is_signed_in() => return Vec::new(),
            _ => {}
        }

        match command {
            AppCommand::NextPage => self.rotate_page(1),
            AppCommand::PrevPage => self.rotate_page(-1),
            AppCommand::GoTo(page) => {
                self.active_page = page;
                self.mode = AppMode::Nav;
                vec![AppEvent::PageChanged(page)]
            }
            AppCommand::StartSearch => self.enter_list_mode(AppMode::Search),
            AppCommand::OpenForm(kind) => {
                self.mode = AppMode::Form(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ShowDetail(kind) => self.enter_list_mode(AppMode::Detail(kind)),
            AppCommand::RequestDelete => self.enter_list_mode(AppMode::ConfirmDelete),
            AppCommand::EditSettings => {
                if self.active_page != PageKind::SystemSettings {
                    return Vec::new();
                }
                self.mode = AppMode::Settings;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ShowHelp => {
                self.mode = AppMode::Help;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::CycleRange => {
                self.monitoring_range = self.monitoring_range.next();
                vec![
                    AppEvent::RangeChanged(self.monitoring_range),
                    self.set_status(&format!("range {}", self.monitoring_range)),
                ]
            }
            AppCommand::SignOut => {
                self.session = None;
                self.mode = AppMode::SignIn;
                vec![
                    AppEvent::SessionEnded,
                    AppEvent::ModeChanged(self.mode),
                    self.set_status("signed out"),
                ]
            }
            AppCommand::SignedIn(_) | AppCommand::SetStatus(_) | AppCommand::ClearStatus => {
                Vec::new()
            }
        }
    }

    fn enter_list_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        if self.active_page.record_kind().is_none() {
            return Vec::new();
        }
        self.mode = mode;
        vec![AppEvent::ModeChanged(self.mode)]
    }

    fn rotate_page(&mut self, delta: isize) -> Vec<AppEvent> {
        let pages = PageKind::ALL;
        let current = pages
            .iter()
            .position(|page| *page == self.active_page)
            .unwrap_or(0) as isize;
        let len = pages.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_page = pages[next];
        vec![AppEvent::PageChanged(self.active_page)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
