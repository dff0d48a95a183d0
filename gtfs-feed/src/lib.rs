//! Decoding and validation for GTFS transit feeds.
//!
//! Two pipelines share the scalar types in [`domain`]:
//!
//! - [`realtime`] decodes a GTFS-realtime protocol buffer into a typed
//!   [`FeedMessage`](realtime::FeedMessage) using the hand-written reader in
//!   [`wire`].
//! - [`schedule`] turns tokenized static tables into a validated, indexed
//!   [`Feed`](schedule::Feed), or a report of everything wrong with them.
//!
//! [`source`] reads a directory of `.txt` tables from disk and [`config`]
//! loads the settings for both pipelines.

pub mod config;
pub mod domain;
pub mod realtime;
pub mod schedule;
pub mod source;
pub mod wire;
