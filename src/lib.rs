//! Bharat Server Library
//!
//! Transliteration between Indian scripts, OCR of photographed text, and
//! geotagged notes owned by bearer-token accounts. The server binary is in
//! main.rs; everything it wires together lives here so integration tests and
//! benchmarks can reach it.
//!
//! # Modules
//!
//! - `auth`: password hashing, JWT issuance and the `CurrentAccount` extractor
//! - `accounts`: registration and login
//! - `db`: SQLite persistence for accounts and notes
//! - `ocr`: text recognition providers
//! - `translit`: script conversion and the transliteration service
//! - `routes`: the HTTP surface

pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ocr;
pub mod routes;
pub mod state;
pub mod translit;
