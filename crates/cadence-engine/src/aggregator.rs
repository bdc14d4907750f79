//! Gather the occurrences of every definition that touches a set of users.
//!
//! Definitions are fetched from the store, validated, narrowed by the candidate
//! selector and expanded one after another. Occurrences of a single definition
//! stay in ascending order; definitions follow the store's order. A definition
//! shared by several of the queried users is still expanded once.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::definition::{EventDefinition, UserId};
use crate::error::Result;
use crate::expander::{self, Occurrence, Occurrences};
use crate::selector;
use crate::store::EventStore;

/// Collect every occurrence in `[since, till]` of the definitions involving `users`.
///
/// # Errors
/// Propagates store failures, and returns `CadenceError::MalformedDefinition` for the
/// first invalid definition encountered. One bad definition aborts the whole query.
pub fn list<S: EventStore + ?Sized>(
    store: &S,
    users: &BTreeSet<UserId>,
    since: NaiveDateTime,
    till: NaiveDateTime,
) -> Result<Vec<Occurrence>> {
    let definitions = store.definitions_for(users)?;
    debug!(
        users = users.len(),
        definitions = definitions.len(),
        %since,
        %till,
        "listing occurrences"
    );
    stream(definitions, since, till).collect()
}

/// Lazily expand `definitions` over `[since, till]`.
pub fn stream(definitions: Vec<EventDefinition>, since: NaiveDateTime, till: NaiveDateTime) -> OccurrenceStream {
    OccurrenceStream {
        definitions: definitions.into_iter(),
        current: None,
        since,
        till,
        failed: false,
    }
}

/// Iterator over the occurrences of many definitions, produced by [`stream`].
///
/// Yields `Err` once for a malformed definition and then ends.
#[derive(Debug)]
pub struct OccurrenceStream {
    definitions: std::vec::IntoIter<EventDefinition>,
    current: Option<Occurrences>,
    since: NaiveDateTime,
    till: NaiveDateTime,
    failed: bool,
}

impl Iterator for OccurrenceStream {
    type Item = Result<Occurrence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(occurrence) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Ok(occurrence));
            }
            let definition = self.definitions.next()?;
            if let Err(e) = definition.validate() {
                self.failed = true;
                self.current = None;
                return Some(Err(e));
            }
            if !selector::is_candidate(&definition, self.since, self.till) {
                trace!(id = %definition.id, rule = %definition.rule, "definition filtered out");
                continue;
            }
            trace!(id = %definition.id, rule = %definition.rule, "expanding definition");
            self.current = Some(expander::expand(&definition, self.since, self.till));
        }
    }
}
