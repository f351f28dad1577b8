//! CLI module for toolcat - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for browsing, linting,
//! normalizing and preparing catalog tools.

pub mod commands;

pub use commands::Cli;
