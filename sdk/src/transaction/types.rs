//! Core value types for Meridian transactions.
//!
//! These are the vocabulary every transaction is built from: account
//! triplets, wall-clock timestamps, validity windows, and the
//! (account, validStart) pair that identifies a transaction
//! network-wide. All of them are small, `Copy`, and immutable.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_VALID_DURATION_SECS;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A Meridian account: shard, realm, and account number.
///
/// The canonical text form is `shard.realm.num`, e.g. `0.0.1001`. All
/// three components are non-negative; the schema validator rejects
/// anything else before it reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId {
    pub shard: i64,
    pub realm: i64,
    pub num: i64,
}

impl AccountId {
    pub const fn new(shard: i64, realm: i64, num: i64) -> Self {
        Self { shard, realm, num }
    }

    /// Shorthand for an account in the default shard and realm, which
    /// is where every account on the public network lives today.
    pub const fn from_num(num: i64) -> Self {
        Self { shard: 0, realm: 0, num }
    }

    /// True when all components are non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.shard >= 0 && self.realm >= 0 && self.num >= 0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// The text did not parse as `shard.realm.num`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed account id {0:?}: expected shard.realm.num")]
pub struct ParseAccountIdError(pub String);

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseAccountIdError(s.to_string());
        let mut parts = s.split('.');
        let shard = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let realm = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let num = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        if parts.next().is_some() {
            return Err(bad());
        }
        let id = Self { shard, realm, num };
        if !id.is_well_formed() {
            return Err(bad());
        }
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A point in time: seconds since the Unix epoch plus a nanosecond
/// remainder in `0..1_000_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// The current wall-clock time. Used as the default `validStart` of
    /// a new transaction; the nanosecond component keeps two
    /// transactions built in the same second from colliding on their
    /// transaction id.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            seconds: now.timestamp(),
            nanos: now.timestamp_subsec_nanos() as i32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

// ---------------------------------------------------------------------------
// ValidDuration
// ---------------------------------------------------------------------------

/// How long past `validStart` the network will still accept the
/// transaction. Must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidDuration {
    pub seconds: i64,
}

impl ValidDuration {
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }
}

impl Default for ValidDuration {
    fn default() -> Self {
        Self { seconds: DEFAULT_VALID_DURATION_SECS }
    }
}

impl fmt::Display for ValidDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// Network-wide transaction identity: the paying account plus the start
/// of the validity window.
///
/// No hash involved. Two transactions from the same payer with the same
/// `validStart` are the same transaction as far as the network is
/// concerned, which is exactly what makes duplicate submission
/// detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
}

impl TransactionId {
    pub const fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self { account_id, valid_start }
    }

    /// A fresh id for `account_id` starting now.
    pub fn generate(account_id: AccountId) -> Self {
        Self { account_id, valid_start: Timestamp::now() }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
