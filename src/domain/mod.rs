//! Domain layer - pure types and logic, no I/O.

pub mod auth;
pub mod foundation;
pub mod member;
pub mod webhook;
