// ABOUTME: Interactive selection state machine over the candidate host list
// ABOUTME: Explicit tagged states keep the terminal cases testable without a real terminal

use crate::registry::HostRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    MoveUp,
    MoveDown,
    Confirm,
    Quit,
}

/// Selection progress. `Selected` and `Cancelled` are terminal; once
/// either is reached, further events are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorState {
    Browsing { cursor: usize },
    Selected { name: String },
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Selector {
    records: Vec<HostRecord>,
    state: SelectorState,
}

impl Selector {
    /// Callers must rule out an empty candidate list before building a
    /// selector; there is nothing to browse otherwise.
    pub fn new(records: Vec<HostRecord>) -> Self {
        debug_assert!(!records.is_empty(), "selector needs at least one candidate");
        Self {
            records,
            state: SelectorState::Browsing { cursor: 0 },
        }
    }

    pub fn update(&mut self, event: SelectorEvent) {
        let SelectorState::Browsing { cursor } = self.state else {
            return;
        };

        self.state = match event {
            SelectorEvent::MoveUp => SelectorState::Browsing {
                cursor: cursor.saturating_sub(1),
            },
            SelectorEvent::MoveDown => SelectorState::Browsing {
                cursor: (cursor + 1).min(self.records.len() - 1),
            },
            SelectorEvent::Confirm => SelectorState::Selected {
                name: self.records[cursor].name.clone(),
            },
            SelectorEvent::Quit => SelectorState::Cancelled,
        };
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn records(&self) -> &[HostRecord] {
        &self.records
    }

    /// Cursor position while browsing, None once a terminal state is
    /// reached.
    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            SelectorState::Browsing { cursor } => Some(cursor),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, SelectorState::Browsing { .. })
    }

    /// Consumes the selector, yielding the confirmed record if there is
    /// one. Names are unique within the registry, so the lookup is exact.
    pub fn into_selection(self) -> Option<HostRecord> {
        let SelectorState::Selected { name } = self.state else {
            return None;
        };
        self.records.into_iter().find(|record| record.name == name)
    }
}
