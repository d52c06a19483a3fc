pub mod accounts;

pub use accounts::{AccountStore, PgAccountStore};
