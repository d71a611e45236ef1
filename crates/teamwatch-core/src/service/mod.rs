//! Domain services

mod roster_diff;

pub use roster_diff::filter_new_members;
