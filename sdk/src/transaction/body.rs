//! Transaction body construction.
//!
//! A [`TransactionBody`] is everything a signature covers: the
//! transaction id, the node it will be submitted to, the fee cap, the
//! validity window, an optional memo, and the operation payload. The
//! struct is immutable once built; there are no setters, because
//! changing any field after signing would silently invalidate every
//! signature already attached downstream.
//!
//! Construction goes through [`TransactionBodyBuilder`], which fills in
//! the network defaults (fee, validity window, valid-start time) the
//! caller does not supply. Builders for automated tests pin
//! `valid_start` explicitly; everything else about a body is already
//! deterministic.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_TX_FEE, MAX_MEMO_BYTES};
use crate::schema::SchemaViolation;
use crate::transaction::types::{AccountId, Timestamp, TransactionId, ValidDuration};

// ---------------------------------------------------------------------------
// Operation payload
// ---------------------------------------------------------------------------

/// One leg of a transfer. Positive amounts credit the account, negative
/// amounts debit it; the network requires the legs of a transfer to sum
/// to zero, but that is a ledger rule, not a schema rule, so it is
/// checked there and not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account_id: AccountId,
    pub amount: i64,
}

/// The legs of a crypto transfer, in caller order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferList {
    pub transfers: Vec<AccountAmount>,
}

/// The operation a transaction performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Move motes between accounts.
    CryptoTransfer(TransferList),
}

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

/// The signed portion of a transaction.
///
/// Fields are private and exposed through read-only accessors. The
/// transaction id in particular is fixed at build time: it is the
/// transaction's network-wide identity, and rewriting it would turn one
/// transaction into a different one while keeping the old signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    transaction_id: TransactionId,
    node_account_id: AccountId,
    fee: u64,
    valid_duration: ValidDuration,
    memo: Option<String>,
    operation: Option<Operation>,
}

impl TransactionBody {
    /// Starts a builder for a transaction paid by `payer` and submitted
    /// to `node`.
    pub fn builder(payer: AccountId, node: AccountId) -> TransactionBodyBuilder {
        TransactionBodyBuilder {
            payer,
            node,
            valid_start: None,
            fee: DEFAULT_TX_FEE,
            valid_duration: ValidDuration::default(),
            memo: None,
            operation: None,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn node_account_id(&self) -> &AccountId {
        &self.node_account_id
    }

    /// Maximum fee the payer is willing to be charged, in motes.
    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn valid_duration(&self) -> ValidDuration {
        self.valid_duration
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    /// Checks the body against the schema's value constraints. The
    /// encoder runs this before writing any bytes; callers can run it
    /// earlier to fail before key material is even loaded.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        validate_account(&self.transaction_id.account_id, "transactionId")?;
        validate_account(&self.node_account_id, "nodeAccountId")?;

        if self.valid_duration.seconds <= 0 {
            return Err(SchemaViolation::InvalidValue {
                message: "TransactionBody",
                field: "validDuration",
                reason: format!("must be positive, got {}", self.valid_duration.seconds),
            });
        }

        if let Some(memo) = &self.memo {
            if memo.len() > MAX_MEMO_BYTES {
                return Err(SchemaViolation::InvalidValue {
                    message: "TransactionBody",
                    field: "memo",
                    reason: format!("{} bytes exceeds the {MAX_MEMO_BYTES}-byte limit", memo.len()),
                });
            }
        }

        if let Some(Operation::CryptoTransfer(list)) = &self.operation {
            if list.transfers.is_empty() {
                return Err(SchemaViolation::InvalidValue {
                    message: "TransferList",
                    field: "accountAmounts",
                    reason: "transfer list is empty".to_string(),
                });
            }
            for leg in &list.transfers {
                validate_account(&leg.account_id, "accountAmounts")?;
            }
        }

        Ok(())
    }

    /// Assembles a body from already-decoded parts. Only the decoder
    /// uses this; everyone else goes through the builder.
    pub(crate) fn from_parts(
        transaction_id: TransactionId,
        node_account_id: AccountId,
        fee: u64,
        valid_duration: ValidDuration,
        memo: Option<String>,
        operation: Option<Operation>,
    ) -> Self {
        Self { transaction_id, node_account_id, fee, valid_duration, memo, operation }
    }
}

fn validate_account(id: &AccountId, field: &'static str) -> Result<(), SchemaViolation> {
    if !id.is_well_formed() {
        return Err(SchemaViolation::InvalidValue {
            message: "AccountId",
            field,
            reason: format!("components must be non-negative, got {id}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TransactionBodyBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`TransactionBody`].
///
/// Defaults: fee [`DEFAULT_TX_FEE`], validity window
/// [`ValidDuration::default`] (120 s), `validStart` the wall clock at
/// `build()` time.
///
/// ```
/// use meridian_sdk::transaction::body::TransactionBody;
/// use meridian_sdk::transaction::types::AccountId;
///
/// let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
///     .memo("invoice 44")
///     .transfer(AccountId::from_num(2), -500)
///     .transfer(AccountId::from_num(1001), 500)
///     .build();
/// assert_eq!(body.fee(), 100_000_000);
/// ```
#[derive(Debug)]
pub struct TransactionBodyBuilder {
    payer: AccountId,
    node: AccountId,
    valid_start: Option<Timestamp>,
    fee: u64,
    valid_duration: ValidDuration,
    memo: Option<String>,
    operation: Option<Operation>,
}

impl TransactionBodyBuilder {
    /// Pins the start of the validity window. Without this, `build()`
    /// reads the clock, and two builds of the same logical transaction
    /// get different transaction ids.
    pub fn valid_start(mut self, valid_start: Timestamp) -> Self {
        self.valid_start = Some(valid_start);
        self
    }

    /// Overrides the fee cap, in motes.
    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn valid_duration(mut self, duration: ValidDuration) -> Self {
        self.valid_duration = duration;
        self
    }

    pub fn valid_duration_seconds(mut self, seconds: i64) -> Self {
        self.valid_duration = ValidDuration::from_seconds(seconds);
        self
    }

    /// Attaches a memo. The empty string is normalized to "no memo" so
    /// the two spellings of absence cannot produce different wire bytes.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        let memo = memo.into();
        self.memo = if memo.is_empty() { None } else { Some(memo) };
        self
    }

    /// Sets the operation payload wholesale.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Appends one transfer leg, creating the crypto-transfer payload
    /// on first use. Legs keep the order they were added in.
    pub fn transfer(mut self, account_id: AccountId, amount: i64) -> Self {
        let list = match self.operation.get_or_insert_with(|| {
            Operation::CryptoTransfer(TransferList::default())
        }) {
            Operation::CryptoTransfer(list) => list,
        };
        list.transfers.push(AccountAmount { account_id, amount });
        self
    }

    /// Produces the immutable body. The transaction id is fixed here
    /// and never changes again.
    pub fn build(self) -> TransactionBody {
        let valid_start = self.valid_start.unwrap_or_else(Timestamp::now);
        TransactionBody {
            transaction_id: TransactionId::new(self.payer, valid_start),
            node_account_id: self.node,
            fee: self.fee,
            valid_duration: self.valid_duration,
            memo: self.memo,
            operation: self.operation,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> TransactionBody {
        TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::new(1_700_000_000, 0))
            .memo("test")
            .build()
    }

    #[test]
    fn builder_applies_network_defaults() {
        let body = sample_body();
        assert_eq!(body.fee(), DEFAULT_TX_FEE);
        assert_eq!(body.valid_duration().seconds, 120);
    }

    #[test]
    fn transaction_id_combines_payer_and_valid_start() {
        let body = sample_body();
        assert_eq!(body.transaction_id().account_id, AccountId::from_num(2));
        assert_eq!(body.transaction_id().valid_start, Timestamp::new(1_700_000_000, 0));
    }

    #[test]
    fn pinned_valid_start_makes_bodies_reproducible() {
        assert_eq!(sample_body(), sample_body());
    }

    #[test]
    fn unpinned_valid_start_reads_the_clock() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3)).build();
        assert!(body.transaction_id().valid_start.seconds > 1_700_000_000);
    }

    #[test]
    fn empty_memo_is_absent() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .memo("")
            .build();
        assert_eq!(body.memo(), None);
    }

    #[test]
    fn transfer_legs_keep_their_order() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .transfer(AccountId::from_num(2), -500)
            .transfer(AccountId::from_num(1001), 500)
            .build();
        let Some(Operation::CryptoTransfer(list)) = body.operation() else {
            panic!("expected a crypto transfer");
        };
        assert_eq!(list.transfers[0].account_id, AccountId::from_num(2));
        assert_eq!(list.transfers[0].amount, -500);
        assert_eq!(list.transfers[1].amount, 500);
    }

    #[test]
    fn valid_body_validates() {
        assert_eq!(sample_body().validate(), Ok(()));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .valid_duration_seconds(0)
            .build();
        assert!(matches!(
            body.validate(),
            Err(SchemaViolation::InvalidValue { field: "validDuration", .. })
        ));
    }

    #[test]
    fn oversized_memo_is_rejected() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .memo("x".repeat(MAX_MEMO_BYTES + 1))
            .build();
        assert!(matches!(
            body.validate(),
            Err(SchemaViolation::InvalidValue { field: "memo", .. })
        ));
    }

    #[test]
    fn memo_at_the_limit_is_fine() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .memo("x".repeat(MAX_MEMO_BYTES))
            .build();
        assert_eq!(body.validate(), Ok(()));
    }

    #[test]
    fn negative_account_component_is_rejected() {
        let body = TransactionBody::builder(AccountId::new(0, 0, -4), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .build();
        assert!(matches!(
            body.validate(),
            Err(SchemaViolation::InvalidValue { field: "transactionId", .. })
        ));
    }

    #[test]
    fn empty_transfer_list_is_rejected() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .operation(Operation::CryptoTransfer(TransferList::default()))
            .build();
        assert!(matches!(
            body.validate(),
            Err(SchemaViolation::InvalidValue { message: "TransferList", .. })
        ));
    }

    #[test]
    fn body_serde_roundtrip() {
        let body = sample_body();
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(serde_json::from_str::<TransactionBody>(&json).unwrap(), body);
    }
}
