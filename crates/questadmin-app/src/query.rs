// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::ids::RecordId;
use crate::model::{Labeled, RecordKind};

/// One discrete filter selection: everything, or exactly one enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: Labeled> Choice<T> {
    pub fn admits(self, value: T) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == value,
        }
    }

    /// Steps all -> first -> ... -> last -> all.
    pub fn cycle(self) -> Self {
        let values = T::all();
        match self {
            Self::All => values.first().map_or(Self::All, |value| Self::Only(*value)),
            Self::Only(current) => {
                let index = values.iter().position(|value| *value == current);
                match index.and_then(|index| values.get(index + 1)) {
                    Some(next) => Self::Only(*next),
                    None => Self::All,
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(value) => value.label(),
        }
    }
}

/// Display view of one filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSlot {
    pub name: &'static str,
    pub value: &'static str,
}

/// The discrete selections a record kind can be narrowed by.
pub trait FilterSet: Clone + Default + std::fmt::Debug + PartialEq {
    fn slots(&self) -> Vec<FilterSlot>;
    fn cycle(&mut self, slot: usize);
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Case-insensitive substring match over any of `fields`. A blank keyword
/// matches everything.
pub fn keyword_matches(keyword: &str, fields: &[&str]) -> bool {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    /// 1-based index of the first row shown, 0 when empty.
    pub range_start: usize,
    pub range_end: usize,
}

impl PageWindow {
    pub fn new(total_count: usize, page_size: usize, requested_page: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size).max(1);
        let page = requested_page.clamp(1, total_pages);
        let offset = (page - 1) * page_size;
        let range_end = (offset + page_size).min(total_count);
        let range_start = if total_count == 0 { 0 } else { offset + 1 };
        Self {
            page,
            page_size,
            total_count,
            total_pages,
            range_start,
            range_end,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Paged<T> {
    let window = PageWindow::new(items.len(), page_size, page);
    let items = items
        .iter()
        .skip(window.offset())
        .take(window.page_size)
        .cloned()
        .collect();
    Paged { items, window }
}

/// Search, filter and page position for one list page. Changing the keyword
/// or any filter returns to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<F> {
    pub keyword: String,
    pub filter: F,
    pub page: usize,
}

impl<F: FilterSet> Default for ListState<F> {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            filter: F::default(),
            page: 1,
        }
    }
}

impl<F: FilterSet> ListState<F> {
    pub fn set_keyword(&mut self, keyword: &str) {
        if self.keyword != keyword {
            self.keyword = keyword.to_owned();
            self.page = 1;
        }
    }

    pub fn set_filter(&mut self, filter: F) {
        if self.filter != filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    pub fn cycle_filter(&mut self, slot: usize) {
        self.filter.cycle(slot);
        self.page = 1;
    }

    pub fn goto_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: RecordId,
    pub cells: Vec<String>,
}

/// Kind-erased rendering of one filtered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePage {
    pub kind: RecordKind,
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
    pub window: PageWindow,
    pub keyword: String,
    pub filters: Vec<FilterSlot>,
}
