//! API integration tests.
//!
//! Each test drives the real actix app against its own temporary SQLite
//! database, so no external services are needed.
//!
//! Run with: cargo test --test api

mod helpers;

mod inspection_tests;
mod order_tests;
mod report_tests;
