//! Caller-facing operations: list occurrences and search for a common free slot.
//!
//! This is the layer that rejects usage errors (inverted windows, empty user
//! sets, oversized durations) before any expansion runs.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::aggregator;
use crate::config::SchedulerConfig;
use crate::definition::{EventDefinition, UserId};
use crate::error::{CadenceError, Result};
use crate::expander::Occurrence;
use crate::gap::{self, Interval};
use crate::store::EventStore;

/// Binds a store to the listing and gap-search operations.
#[derive(Debug, Clone)]
pub struct Scheduler<S> {
    store: S,
    config: SchedulerConfig,
}

impl<S: EventStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Scheduler {
            store,
            config: SchedulerConfig::default(),
        }
    }

    pub fn with_config(store: S, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Scheduler { store, config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every occurrence in `[since, till]` of the events involving `users`.
    ///
    /// # Errors
    /// `InvalidWindow` if `till <= since`, `EmptyUserSet` if `users` is empty, and
    /// any store or malformed-definition error raised while expanding.
    pub fn list_occurrences(
        &self,
        users: &BTreeSet<UserId>,
        since: NaiveDateTime,
        till: NaiveDateTime,
    ) -> Result<Vec<Occurrence>> {
        check_users(users)?;
        if till <= since {
            return Err(CadenceError::InvalidWindow {
                since: since.to_string(),
                till: till.to_string(),
            });
        }
        aggregator::list(&self.store, users, since, till)
    }

    /// Earliest interval of length `duration`, at or after `since`, free for all `users`.
    ///
    /// Searches up to the configured horizon past `since`. `Ok(None)` means no such
    /// interval exists inside the horizon.
    ///
    /// # Errors
    /// `EmptyUserSet`, `NonPositiveDuration`, `DurationTooLong`, `HorizonOutOfRange`
    /// when `since` plus the horizon is not representable, and any error from
    /// listing the occurrences in the horizon.
    pub fn find_gap(
        &self,
        users: &BTreeSet<UserId>,
        since: NaiveDateTime,
        duration: Duration,
    ) -> Result<Option<Interval>> {
        check_users(users)?;
        if duration <= Duration::zero() {
            return Err(CadenceError::NonPositiveDuration(duration.num_minutes()));
        }
        if duration > self.config.max_gap() {
            return Err(CadenceError::DurationTooLong {
                minutes: duration.num_minutes(),
                limit: self.config.max_gap().num_minutes(),
            });
        }

        let horizon_end = since.checked_add_signed(self.config.horizon()).ok_or_else(|| {
            CadenceError::HorizonOutOfRange {
                since: since.to_string(),
                days: self.config.horizon_days,
            }
        })?;
        let occurrences = aggregator::list(&self.store, users, since, horizon_end)?;
        let found = gap::find_gap(&occurrences, duration, since, horizon_end);

        debug!(
            users = users.len(),
            occurrences = occurrences.len(),
            minutes = duration.num_minutes(),
            %since,
            found = ?found,
            "gap search finished"
        );
        Ok(found)
    }

    /// Raw definitions the store reports for `users`, without expansion.
    pub fn definitions_touching(&self, users: &BTreeSet<UserId>) -> Result<Vec<EventDefinition>> {
        check_users(users)?;
        self.store.definitions_for(users)
    }
}

fn check_users(users: &BTreeSet<UserId>) -> Result<()> {
    if users.is_empty() {
        Err(CadenceError::EmptyUserSet)
    } else {
        Ok(())
    }
}
