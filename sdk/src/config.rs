//! # Protocol Constants
//!
//! Every magic number the SDK relies on lives here. The values in this
//! module are part of the Meridian wire contract: change one and every
//! signature produced by this crate stops verifying against the network.
//!
//! If you find yourself hardcoding one of these somewhere else in the
//! crate, move it here first.

/// Default transaction fee in motes, the smallest Meridian denomination.
/// Applied by the body builder when the caller does not name a fee.
/// 100,000,000 motes = 1 MRD.
pub const DEFAULT_TX_FEE: u64 = 100_000_000;

/// Default transaction validity window in seconds. A transaction whose
/// consensus timestamp falls outside `validStart + validDuration` is
/// rejected by precheck, so the window has to outlive normal submission
/// latency. Two minutes is the network-recommended value.
pub const DEFAULT_VALID_DURATION_SECS: i64 = 120;

/// Maximum memo length in bytes (UTF-8 encoded). Enforced by precheck;
/// we enforce it client-side as well so a too-long memo fails before the
/// fee is at risk.
pub const MAX_MEMO_BYTES: usize = 100;

/// Maximum size of a serialized transaction envelope in bytes. Nodes
/// drop anything larger without processing it.
pub const MAX_TRANSACTION_BYTES: usize = 6_144;

/// Ed25519 secret key length in bytes.
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;

/// Ed25519 public (verifying) key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;
