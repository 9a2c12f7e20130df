#![doc = "translation-sync-core: core engine for copying theme translations."]

//! This crate contains all logic for synchronising theme-scoped
//! translations between two themes of one shop through the Admin GraphQL
//! API: resource discovery, digest-conditioned input assembly, batched
//! reads and writes, and the run orchestrator. CLI concerns live in the
//! `translation-sync` binary crate.
//!
//! # Usage
//! Construct an [`client::AdminClient`] (or any [`contract::Transport`]),
//! fill in [`synchronise::SyncOptions`], and call
//! [`synchronise::synchronise`].

pub mod bulk;
pub mod client;
pub mod contract;
pub mod discover;
pub mod model;
pub mod synchronise;
