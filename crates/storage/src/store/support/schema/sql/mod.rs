#![forbid(unsafe_code)]

mod access;
mod core;
mod documents;
mod indexes;
mod log_entries;
mod pragmas;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(pragmas::SQL);
    sql.push_str(core::SQL);
    sql.push_str(documents::SQL);
    sql.push_str(access::SQL);
    sql.push_str(log_entries::SQL);
    sql.push_str(indexes::SQL);
    sql
}
