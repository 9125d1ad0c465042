//! In-process adapters for tests and local development.

mod kv;
mod mailer;

pub use kv::InMemoryKvStore;
pub use mailer::{RecordingMailer, SentMagicLink};
