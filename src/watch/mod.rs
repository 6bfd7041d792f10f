//! Background change detection for items assigned to the user.
//!
//! The watcher is pure state: the runtime feeds it board pages and poll
//! results, and it answers which items deserve an alert.

use std::collections::HashMap;
use std::time::Duration;

use crate::model::WorkItem;

/// Time between polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Look-back window for each poll. Must be at least `POLL_INTERVAL`.
pub const CHANGE_WINDOW: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchPhase {
    #[default]
    Idle,
    Checking,
}

/// Why a tick did not start a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotConnected,
    ConfigScreen,
    Disabled,
    NoUser,
    InFlight,
}

/// Conditions sampled from the app when a tick fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    pub connected: bool,
    pub on_config_screen: bool,
    pub notifications_enabled: bool,
    pub has_user: bool,
}

/// An item someone else changed since it was last seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeAlert {
    pub id: i64,
    pub title: String,
    pub rev: i64,
    pub changed_by: String,
}

impl ChangeAlert {
    pub fn message(&self) -> String {
        if self.changed_by.is_empty() {
            format!("#{} '{}' was updated", self.id, self.title)
        } else {
            format!("#{} '{}' was updated by {}", self.id, self.title, self.changed_by)
        }
    }
}

/// Last known revision per item ID, plus the poll phase.
#[derive(Debug, Default)]
pub struct ChangeWatcher {
    known: HashMap<i64, i64>,
    phase: WatchPhase,
}

impl ChangeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    pub fn known_revision(&self, id: i64) -> Option<i64> {
        self.known.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Record revisions the user has already seen, e.g. from a board page.
    pub fn seed(&mut self, items: &[WorkItem]) {
        for item in items {
            let rev = self.known.entry(item.id).or_insert(item.rev);
            if item.rev > *rev {
                *rev = item.rev;
            }
        }
    }

    /// Decide whether this tick starts a poll. On `Ok` the watcher moves to
    /// `Checking` until `absorb` or `check_failed` is called.
    pub fn begin_check(&mut self, ctx: TickContext) -> Result<(), SkipReason> {
        if !ctx.connected {
            return Err(SkipReason::NotConnected);
        }
        if ctx.on_config_screen {
            return Err(SkipReason::ConfigScreen);
        }
        if !ctx.notifications_enabled {
            return Err(SkipReason::Disabled);
        }
        if !ctx.has_user {
            return Err(SkipReason::NoUser);
        }
        if self.phase == WatchPhase::Checking {
            return Err(SkipReason::InFlight);
        }
        self.phase = WatchPhase::Checking;
        Ok(())
    }

    /// Compare a poll result against known revisions.
    ///
    /// A known item alerts only when its revision grew. An unknown item alerts
    /// only if the cache already held something before this poll, so the first
    /// poll after startup never alerts on items the user has not seen.
    pub fn absorb(&mut self, items: &[WorkItem]) -> Vec<ChangeAlert> {
        self.phase = WatchPhase::Idle;
        let cache_was_empty = self.known.is_empty();
        let mut alerts = Vec::new();

        for item in items {
            let changed = match self.known.get(&item.id) {
                Some(&known) => item.rev > known,
                None => !cache_was_empty,
            };
            if changed {
                alerts.push(ChangeAlert {
                    id: item.id,
                    title: item.fields.title.clone(),
                    rev: item.rev,
                    changed_by: item
                        .fields
                        .changed_by
                        .as_ref()
                        .map(|who| who.display_name.clone())
                        .unwrap_or_default(),
                });
            }
            let entry = self.known.entry(item.id).or_insert(item.rev);
            if item.rev > *entry {
                *entry = item.rev;
            }
        }
        alerts
    }

    pub fn check_failed(&mut self) {
        self.phase = WatchPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdentityRef;
    use pretty_assertions::assert_eq;

    fn item(id: i64, rev: i64) -> WorkItem {
        let mut w = WorkItem {
            id,
            rev,
            ..Default::default()
        };
        w.fields.title = format!("Item {id}");
        w
    }

    fn ready() -> TickContext {
        TickContext {
            connected: true,
            on_config_screen: false,
            notifications_enabled: true,
            has_user: true,
        }
    }

    #[test]
    fn seeded_item_alerts_only_on_higher_revision() {
        let mut w = ChangeWatcher::new();
        w.seed(&[item(1, 5)]);

        assert!(w.absorb(&[item(1, 5)]).is_empty());
        assert!(w.absorb(&[item(1, 4)]).is_empty());
        assert_eq!(w.known_revision(1), Some(5));

        let alerts = w.absorb(&[item(1, 6)]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].rev, 6);
        assert!(w.absorb(&[item(1, 6)]).is_empty());
    }

    #[test]
    fn unknown_item_is_silent_when_cache_was_empty() {
        let mut w = ChangeWatcher::new();
        assert!(w.absorb(&[item(7, 1), item(8, 1)]).is_empty());
        assert_eq!(w.known_revision(7), Some(1));
        assert!(w.absorb(&[item(7, 1)]).is_empty());
    }

    #[test]
    fn unknown_item_alerts_once_when_cache_populated() {
        let mut w = ChangeWatcher::new();
        w.seed(&[item(1, 1)]);
        let alerts = w.absorb(&[item(9, 3)]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, 9);
        assert!(w.absorb(&[item(9, 3)]).is_empty());
    }

    #[test]
    fn seeding_keeps_highest_revision() {
        let mut w = ChangeWatcher::new();
        w.seed(&[item(1, 4)]);
        w.seed(&[item(1, 2)]);
        assert_eq!(w.known_revision(1), Some(4));
    }

    #[test]
    fn tick_skips_and_in_flight_guard() {
        let mut w = ChangeWatcher::new();
        let off_screen = TickContext {
            on_config_screen: true,
            ..ready()
        };
        assert_eq!(w.begin_check(off_screen), Err(SkipReason::ConfigScreen));
        let disabled = TickContext {
            notifications_enabled: false,
            ..ready()
        };
        assert_eq!(w.begin_check(disabled), Err(SkipReason::Disabled));
        let anonymous = TickContext {
            has_user: false,
            ..ready()
        };
        assert_eq!(w.begin_check(anonymous), Err(SkipReason::NoUser));

        assert_eq!(w.begin_check(ready()), Ok(()));
        assert_eq!(w.phase(), WatchPhase::Checking);
        assert_eq!(w.begin_check(ready()), Err(SkipReason::InFlight));
        w.check_failed();
        assert_eq!(w.begin_check(ready()), Ok(()));
    }

    #[test]
    fn alert_message_names_editor() {
        let mut changed = item(3, 2);
        changed.fields.changed_by = Some(IdentityRef {
            display_name: "Grace".into(),
            unique_name: "grace@contoso.com".into(),
        });
        let mut w = ChangeWatcher::new();
        w.seed(&[item(3, 1)]);
        let alerts = w.absorb(&[changed]);
        assert_eq!(alerts[0].message(), "#3 'Item 3' was updated by Grace");
    }
}
