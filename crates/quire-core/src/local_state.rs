//! Client-side record cache with two-phase optimistic updates.
//!
//! A change is applied tentatively and a [`Ticket`] is handed back. When the
//! store answers, the ticket is either confirmed with the authoritative
//! record or rolled back to the snapshot taken when it was issued. A full
//! refresh from the store discards every pending ticket.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::{Dashboard, Database, Page};

/// Records addressable by a string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Database {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Page {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Dashboard {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Handle for one pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
enum Undo<T> {
    /// An existing entry was modified.
    Restore { key: String, prior: T },
    /// A new entry was added.
    Discard { key: String },
    /// Entries were removed, with their positions.
    Reinsert { removed: Vec<(usize, T)> },
}

#[derive(Debug)]
pub struct LocalState<T> {
    items: Vec<T>,
    pending: HashMap<Ticket, Undo<T>>,
    next_ticket: u64,
}

impl<T> Default for LocalState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }
}

impl<T: Keyed + Clone> LocalState<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|i| i.key() == key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn issue(&mut self, undo: Undo<T>) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(ticket, undo);
        ticket
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|i| i.key() == key)
    }

    /// Modify an entry in place, keeping its prior value.
    pub fn apply_tentative<F>(&mut self, key: &str, change: F) -> Result<Ticket>
    where
        F: FnOnce(&mut T),
    {
        let idx = self
            .position(key)
            .ok_or_else(|| Error::NotFound(format!("{} is not in local state", key)))?;
        let prior = self.items[idx].clone();
        change(&mut self.items[idx]);
        Ok(self.issue(Undo::Restore {
            key: key.to_string(),
            prior,
        }))
    }

    /// Add an entry, typically under a temporary key.
    pub fn insert_tentative(&mut self, item: T) -> Ticket {
        let key = item.key().to_string();
        self.items.push(item);
        self.issue(Undo::Discard { key })
    }

    /// Remove every entry matching `pred` (an entry and its children, say).
    pub fn remove_tentative<P>(&mut self, pred: P) -> Ticket
    where
        P: Fn(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for (idx, item) in std::mem::take(&mut self.items).into_iter().enumerate() {
            if pred(&item) {
                removed.push((idx, item));
            } else {
                kept.push(item);
            }
        }
        self.items = kept;
        self.issue(Undo::Reinsert { removed })
    }

    /// Settle a ticket with the store's answer. The authoritative record
    /// replaces the tentative one (and may carry a different key). Returns
    /// false for unknown or already settled tickets.
    pub fn confirm(&mut self, ticket: Ticket, authoritative: Option<T>) -> bool {
        let Some(undo) = self.pending.remove(&ticket) else {
            return false;
        };
        let key = match undo {
            Undo::Restore { key, .. } | Undo::Discard { key } => key,
            Undo::Reinsert { .. } => return true,
        };
        if let Some(record) = authoritative {
            match self.position(&key) {
                Some(idx) => self.items[idx] = record,
                None => self.items.push(record),
            }
        }
        true
    }

    /// Undo a ticket's change. Returns false for unknown or already settled
    /// tickets.
    pub fn rollback(&mut self, ticket: Ticket) -> bool {
        let Some(undo) = self.pending.remove(&ticket) else {
            return false;
        };
        match undo {
            Undo::Restore { key, prior } => match self.position(&key) {
                Some(idx) => self.items[idx] = prior,
                None => self.items.push(prior),
            },
            Undo::Discard { key } => {
                if let Some(idx) = self.position(&key) {
                    self.items.remove(idx);
                }
            }
            Undo::Reinsert { removed } => {
                for (idx, item) in removed {
                    let at = idx.min(self.items.len());
                    self.items.insert(at, item);
                }
            }
        }
        true
    }

    /// Replace everything from the source of truth.
    pub fn refresh(&mut self, items: Vec<T>) {
        self.items = items;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::fixtures::page;

    fn titles(state: &LocalState<Page>) -> Vec<String> {
        state.items().iter().map(|p| p.title.clone()).collect()
    }

    fn state() -> LocalState<Page> {
        LocalState::new(vec![
            page("1", None, None),
            page("2", Some("1"), None),
            page("3", None, None),
        ])
    }

    #[test]
    fn test_apply_then_rollback_restores_prior() {
        let mut s = state();
        let t = s.apply_tentative("1", |p| p.title = "Renamed".into()).unwrap();
        assert_eq!(s.get("1").unwrap().title, "Renamed");
        assert!(s.rollback(t));
        assert_eq!(s.get("1").unwrap().title, "Page 1");
        assert_eq!(s.pending_count(), 0);
        assert!(!s.rollback(t));
    }

    #[test]
    fn test_confirm_takes_authoritative_value() {
        let mut s = state();
        let t = s.apply_tentative("1", |p| p.title = "Draft".into()).unwrap();
        let mut server = page("1", None, None);
        server.title = "Saved".into();
        assert!(s.confirm(t, Some(server)));
        assert_eq!(s.get("1").unwrap().title, "Saved");
        assert!(!s.rollback(t));
    }

    #[test]
    fn test_insert_confirm_replaces_temporary_key() {
        let mut s = state();
        let t = s.insert_tentative(page("temp-1", None, None));
        assert!(s.get("temp-1").is_some());
        assert!(s.confirm(t, Some(page("real", None, None))));
        assert!(s.get("temp-1").is_none());
        assert!(s.get("real").is_some());
        assert_eq!(s.items().len(), 4);
    }

    #[test]
    fn test_insert_rollback_discards() {
        let mut s = state();
        let t = s.insert_tentative(page("temp-1", None, None));
        s.rollback(t);
        assert_eq!(s.items().len(), 3);
    }

    #[test]
    fn test_remove_rollback_reinserts_in_place() {
        let mut s = state();
        let t = s.remove_tentative(|p| p.id == "1" || p.parent_id.as_deref() == Some("1"));
        assert_eq!(titles(&s), vec!["Page 3"]);
        s.rollback(t);
        assert_eq!(titles(&s), vec!["Page 1", "Page 2", "Page 3"]);
    }

    #[test]
    fn test_apply_missing_key() {
        let mut s = state();
        assert!(matches!(
            s.apply_tentative("nope", |_| {}),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_refresh_drops_pending() {
        let mut s = state();
        let t = s.apply_tentative("3", |p| p.title = "X".into()).unwrap();
        s.refresh(vec![page("9", None, None)]);
        assert_eq!(s.pending_count(), 0);
        assert!(!s.confirm(t, None));
        assert_eq!(titles(&s), vec!["Page 9"]);
    }
}
