//! Lichess client tests against a mock HTTP server

mod status;
