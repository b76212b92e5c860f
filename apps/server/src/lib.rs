//! Atelier QC server library.
//!
//! Production orders, task lifecycle, QC inspection evaluation with defect
//! logging, and quality reports, served over an actix-web JSON API.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
