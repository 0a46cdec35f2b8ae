// file: src/logging/mod.rs
// version: 1.0.0
// guid: c3d4e5f6-a7b8-9012-3456-789012cdefab

//! Logging module

pub mod logger;
