//! ReplyPilot - Review sync and AI reply drafting service.
//!
//! Periodically imports customer reviews from the external review
//! platform, drafts suggested replies with an AI provider, and keeps
//! per-organization subscription tiers in step with billing webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
