mod durable;
pub mod error;
mod keys;
pub mod kv;
pub mod snapshot;

pub use durable::*;
pub use error::*;
pub use keys::*;
