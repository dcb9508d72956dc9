//! Quiver - versioned storage for saved KQL queries.
//!
//! This crate provides both a CLI application and a library for keeping a
//! collection of named KQL queries with append-only version history,
//! favorites, and tags.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Public modules for library usage
pub mod domain;
pub mod error;
pub mod id_generation;
pub mod storage;

// Application context and output formatting (needed by binary)
pub mod app;
pub mod output;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;
