// file: src/cli/mod.rs
// version: 1.0.0
// guid: e7f8a9b0-c1d2-3456-7890-123456efabcd

//! Command line interface

pub mod args;
pub mod commands;
