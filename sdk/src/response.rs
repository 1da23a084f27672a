//! # Precheck Response Interpretation
//!
//! When a node receives a transaction it runs precheck, a cheap
//! validation pass before consensus, and answers with a numeric status
//! code. This module turns that code into a [`PrecheckOutcome`] the
//! caller can inspect.
//!
//! Two rules are fixed network behavior and preserved exactly:
//!
//! - Code `0` means the transaction passed precheck.
//! - An absent code also means success. Older node versions omit the
//!   field entirely on the happy path, so absence is not an error.
//!
//! Rejections are values, not errors: a rejected transaction is a
//! normal outcome the caller may react to (pick another node on `BUSY`,
//! rebuild the window on `TRANSACTION_EXPIRED`). Whether and how to
//! retry is the transport layer's business; nothing here loops.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node's precheck answer as it arrives from the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The precheck status code, if the node sent one.
    pub precheck_code: Option<u32>,
}

/// A precheck rejection: the numeric code and its human-readable
/// reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub code: u32,
    pub reason: &'static str,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "precheck {}: {}", self.code, self.reason)
    }
}

/// The interpreted outcome of a precheck response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckOutcome {
    /// The node accepted the transaction for consensus processing.
    Ok,
    /// The node declined the transaction.
    Rejected(Rejection),
}

impl PrecheckOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_ok()
    }

    /// Converts the outcome into a `Result` for callers that want `?`
    /// at the submission boundary.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Self::Ok => Ok(()),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Reason used for codes the table does not know. New node releases can
/// introduce codes faster than SDKs ship, so an unknown code has to
/// stay a readable rejection instead of a lookup failure.
const UNRECOGNIZED: &str = "unrecognized precheck code";

/// The human-readable reason for a precheck code.
pub fn reason_for(code: u32) -> &'static str {
    match code {
        0 => "transaction passed precheck",
        1 => "transaction body failed validation",
        2 => "payer account not found",
        3 => "transaction names a node account other than the receiving node",
        4 => "transaction validity window has expired",
        5 => "transaction start time is invalid",
        6 => "transaction valid duration is out of range",
        7 => "transaction signature is invalid",
        8 => "memo exceeds the maximum length",
        9 => "offered transaction fee is insufficient",
        10 => "payer balance cannot cover the fee",
        11 => "duplicate of a transaction already submitted",
        12 => "node is busy; resubmit to another node",
        13 => "operation is not supported by this node",
        14 => "referenced account id is malformed",
        15 => "no signature pairs were provided",
        16 => "transfer list does not balance to zero",
        17 => "query header is malformed",
        18 => "requested response type is not supported",
        19 => "requested records are unavailable",
        20 => "query payment is missing",
        21 => "node failed to create the transaction",
        _ => UNRECOGNIZED,
    }
}

/// Maps a precheck code to an outcome. `0` and `None` are success;
/// everything else is a [`Rejection`] carrying the code and its reason.
pub fn interpret(code: Option<u32>) -> PrecheckOutcome {
    match code {
        None | Some(0) => PrecheckOutcome::Ok,
        Some(code) => PrecheckOutcome::Rejected(Rejection { code, reason: reason_for(code) }),
    }
}

/// Interprets a transport-shaped response object.
pub fn interpret_response(response: &TransactionResponse) -> PrecheckOutcome {
    interpret(response.precheck_code)
}
