// Copyright (c) 2026 Meridian Labs. MIT License.
// See LICENSE for details.

//! # Meridian SDK: Core Library
//!
//! The client-side core for talking to the Meridian public ledger:
//! build a transaction body, encode it canonically, sign the exact
//! bytes with Ed25519, assemble the signed envelope, and interpret the
//! node's precheck answer.
//!
//! What this crate is NOT: a network client. There is no socket, no
//! retry loop, and no RNG anywhere in here. The transport layer hands
//! hex strings to the wire and response objects back; everything in
//! between those two moments is this crate's job, and all of it is
//! synchronous, deterministic, and safe to call from any thread.
//!
//! ## Architecture
//!
//! - **wire**: Varint/zigzag/length-delimited primitives and the hex
//!   transport codec. Strict in both directions.
//! - **schema**: The immutable registry of wire-message descriptors;
//!   validation lives here, not scattered through the codecs.
//! - **crypto**: Ed25519 key and signature types. Keys come from the
//!   caller; this crate never generates or stores them.
//! - **transaction**: Body construction, canonical encoding, signing,
//!   and envelope assembly.
//! - **query**: Wire shapes for read-only queries.
//! - **response**: Precheck code interpretation.
//! - **config**: Network constants and schema limits.
//!
//! ## The invariant everything hangs on
//!
//! One logical value, one byte representation. Signatures cover the
//! canonical encoding of the body, and the envelope embeds the body by
//! re-encoding it with the same encoder. If encoding were ambiguous,
//! a signature could be valid for bytes the envelope does not contain.
//! Every strictness rule in `wire` and `schema` exists to hold this
//! line.

pub mod config;
pub mod crypto;
pub mod query;
pub mod response;
pub mod schema;
pub mod transaction;
pub mod wire;
