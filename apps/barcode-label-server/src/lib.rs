//! Barcode Label Server Library
//!
//! Renders Code-128 labels as single-page PDFs, merges them into one
//! document and publishes it to S3-compatible storage or a local directory.
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `codes`: request body normalization
//! - `label`: barcode raster and label page rendering
//! - `pdf`: page merging and best-effort barcode decoding
//! - `storage`: artifact publishers (S3, local)
//! - `service`: the generate/decode pipeline
//! - `routes`: HTTP surface

pub mod codes;
pub mod config;
pub mod error;
pub mod label;
pub mod pdf;
pub mod routes;
pub mod service;
pub mod state;
pub mod storage;
