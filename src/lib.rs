//! # CSM Rust Backend
//!
//! Cable schedule aggregation and grouping engine.
//!
//! This crate provides a Rust-based backend for the Cable Schedule Manager (CSM)
//! system, offering efficient import, paging, parallel set resolution, and aggregation
//! of electrical cable schedules. The backend exposes a REST API via Axum for the grid
//! frontend.
//!
//! ## Features
//!
//! - **Data Loading**: Parse exported cable schedules from JSON format
//! - **Parallel Sets**: Deterministic resolution and repair of parallel conductor groups
//! - **Paging**: Stable page windows over large schedules
//! - **Aggregation**: Totals that survive missing and non-finite inputs
//! - **Shop Grouping**: Destination-based grouping with tenant name enrichment
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`db`]: Storage operations, repository pattern, and persistence layer
//! - [`services`]: High-level business logic and grid view services
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific data types and business logic
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]
//! ## Performance
//!
//! This Rust backend is designed for responsive grid interaction over large
//! cable schedules. Key optimizations include:
//!
//! - Page-windowed reads so the grid never loads a whole schedule
//! - Server-side aggregates when the backing store offers them
//! - Efficient JSON-based data processing with serde_json
//! - Minimal allocations in hot paths

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
