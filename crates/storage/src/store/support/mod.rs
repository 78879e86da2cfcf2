#![forbid(unsafe_code)]

mod log_tx;
mod rows;
mod schema;
mod time;

pub(super) use log_tx::*;
pub(super) use rows::*;
pub(super) use schema::migrate_sqlite_schema;
pub(super) use time::now_ms;
