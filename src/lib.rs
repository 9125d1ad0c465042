//! Memberlink - Magic-link authentication and entitlement tracking
//!
//! This crate implements a small membership backend: payment-provider
//! webhooks drive an entitlement record per user, and passwordless login
//! works through single-use emailed tokens exchanged for cookie sessions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
