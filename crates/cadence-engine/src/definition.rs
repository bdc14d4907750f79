//! Stored event definitions and their repetition rules.
//!
//! A definition is the anchor (first occurrence) of an event plus the rule that
//! repeats it. Definitions are owned by the storage collaborator and read-only
//! here; every concrete occurrence is derived from them on demand.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};

/// Identity of a calendar user (their login).
pub type UserId = String;

/// How an event definition repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepetitionRule {
    /// A single occurrence at the anchor.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepetitionRule {
    pub const ALL: [RepetitionRule; 5] = [
        RepetitionRule::None,
        RepetitionRule::Daily,
        RepetitionRule::Weekly,
        RepetitionRule::Monthly,
        RepetitionRule::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RepetitionRule::None => "none",
            RepetitionRule::Daily => "daily",
            RepetitionRule::Weekly => "weekly",
            RepetitionRule::Monthly => "monthly",
            RepetitionRule::Yearly => "yearly",
        }
    }

    /// Numeric code used by storage backends (0 = none .. 4 = yearly).
    pub fn code(self) -> u8 {
        match self {
            RepetitionRule::None => 0,
            RepetitionRule::Daily => 1,
            RepetitionRule::Weekly => 2,
            RepetitionRule::Monthly => 3,
            RepetitionRule::Yearly => 4,
        }
    }
}

impl TryFrom<u8> for RepetitionRule {
    type Error = CadenceError;

    fn try_from(code: u8) -> Result<Self> {
        RepetitionRule::ALL
            .into_iter()
            .find(|rule| rule.code() == code)
            .ok_or_else(|| CadenceError::UnknownRule(code.to_string()))
    }
}

impl FromStr for RepetitionRule {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        RepetitionRule::ALL
            .into_iter()
            .find(|rule| rule.as_str() == lowered)
            .ok_or_else(|| CadenceError::UnknownRule(s.to_string()))
    }
}

impl fmt::Display for RepetitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored event: the anchor interval, its repetition rule, and who takes part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// The user who created the event.
    pub owner: UserId,
    /// Start of the first occurrence.
    pub anchor_start: NaiveDateTime,
    /// End of the first occurrence. Always after `anchor_start`.
    pub anchor_end: NaiveDateTime,
    #[serde(default)]
    pub rule: RepetitionRule,
    /// Everyone attending, owner included.
    pub participants: BTreeSet<UserId>,
}

impl EventDefinition {
    /// Build a definition, adding the owner to the participant set.
    ///
    /// # Errors
    /// Returns `CadenceError::MalformedDefinition` if `anchor_end <= anchor_start`.
    pub fn new<I, U>(
        id: impl Into<String>,
        owner: impl Into<UserId>,
        anchor_start: NaiveDateTime,
        anchor_end: NaiveDateTime,
        rule: RepetitionRule,
        participants: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        let owner = owner.into();
        let mut participants: BTreeSet<UserId> = participants.into_iter().map(Into::into).collect();
        participants.insert(owner.clone());

        let definition = EventDefinition {
            id: id.into(),
            owner,
            anchor_start,
            anchor_end,
            rule,
            participants,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Check the invariants storage is expected to uphold.
    ///
    /// # Errors
    /// Returns `CadenceError::MalformedDefinition` when the anchor interval is empty
    /// or inverted, or when the owner is not among the participants.
    pub fn validate(&self) -> Result<()> {
        if self.anchor_end <= self.anchor_start {
            return Err(self.malformed(format!(
                "anchor_end {} is not after anchor_start {}",
                self.anchor_end, self.anchor_start
            )));
        }
        if !self.participants.contains(&self.owner) {
            return Err(self.malformed(format!(
                "owner {} is missing from participants",
                self.owner
            )));
        }
        Ok(())
    }

    /// Length shared by every occurrence of this definition.
    pub fn duration(&self) -> Duration {
        self.anchor_end - self.anchor_start
    }

    /// True if any of `users` takes part in this event.
    pub fn involves_any(&self, users: &BTreeSet<UserId>) -> bool {
        // Iterate the smaller set.
        if users.len() < self.participants.len() {
            users.iter().any(|u| self.participants.contains(u))
        } else {
            self.participants.iter().any(|p| users.contains(p))
        }
    }

    fn malformed(&self, reason: String) -> CadenceError {
        CadenceError::MalformedDefinition {
            id: self.id.clone(),
            reason,
        }
    }
}
