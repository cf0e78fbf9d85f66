pub use collection::*;
pub use community::*;
pub use config::*;
pub use entity_store::*;
pub use error::*;
pub use image::*;
pub use marketplace::*;
pub use nested::*;
pub use observe::*;
pub use stories::*;

mod collection;
mod community;
pub mod config;
mod entity_store;
pub mod error;
mod image;
mod marketplace;
mod nested;
mod observe;
pub mod seed;
mod stories;
