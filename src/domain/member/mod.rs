//! Member entitlement domain.

mod record;

pub use record::{MemberRecord, PurchaseMode};
