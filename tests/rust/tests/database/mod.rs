//! Database integration tests
//!
//! Schema migrations and the SQLite repositories against on-disk databases.

mod repositories;
