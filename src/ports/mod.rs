//! Ports - capability interfaces implemented by adapters.

mod kv_store;
mod mailer;

pub use kv_store::{session_key, token_key, user_key, KvError, KvStore};
pub use mailer::{MailError, Mailer};
