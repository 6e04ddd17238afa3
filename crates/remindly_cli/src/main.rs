//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `remindly_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("remindly_core version={}", remindly_core::core_version());
    match remindly_core::db::open_db_in_memory() {
        Ok(_) => println!("remindly_core db=ok"),
        Err(err) => println!("remindly_core db=error {err}"),
    }
}
