pub use community::*;
pub use define::*;
pub use error::*;
pub use id::*;
pub use market::*;
pub use nested::*;
pub use story::*;

mod avatar;
mod community;
mod define;
pub mod error;
mod id;
mod market;
mod nested;
mod story;

pub use avatar::avatar_url;
