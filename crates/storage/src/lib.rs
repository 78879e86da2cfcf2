#![forbid(unsafe_code)]

mod store;

pub use rusqlite;
pub use store::*;
