//! # Transaction Module
//!
//! Construction, canonical encoding, signing, and envelope assembly for
//! Meridian transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    - Account, timestamp, duration, and transaction-id value types
//! body.rs     - TransactionBody and its fluent builder
//! codec.rs    - Canonical wire encoding/decoding of bodies and envelopes
//! signing.rs  - Encode-then-sign composition seams
//! envelope.rs - TransactionEnvelope and the signature map
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`TransactionBody::builder`] assembles the immutable
//!    body; defaults come from [`crate::config`].
//! 2. **Sign**: [`sign_body`] (or
//!    [`TransactionEnvelope::sign_and_attach`]) signs the canonical
//!    body bytes with Ed25519.
//! 3. **Assemble**: each signer's pair lands in the envelope's
//!    signature map, in order.
//! 4. **Serialize**: [`TransactionEnvelope::to_hex`] produces the
//!    transport form handed to the network client.
//! 5. **Interpret**: the node's precheck code goes through
//!    [`crate::response::interpret_response`].

pub mod body;
pub mod codec;
pub mod envelope;
pub mod signing;
pub mod types;

pub use body::{AccountAmount, Operation, TransactionBody, TransactionBodyBuilder, TransferList};
pub use codec::{decode_body, decode_envelope, encode_body, encode_envelope};
pub use envelope::{EnvelopeError, SignaturePair, TransactionEnvelope};
pub use signing::{sign_body, sign_body_hex, SignError};
pub use types::{AccountId, Timestamp, TransactionId, ValidDuration};
