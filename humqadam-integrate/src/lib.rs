pub use store_builder::*;

mod store_builder;
