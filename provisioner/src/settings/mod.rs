mod error;
pub mod keys;
mod store;
mod validate;


pub use error::SettingsError;
pub use store::SettingsStore;
pub use validate::{ensure_complete, missing_keys};
