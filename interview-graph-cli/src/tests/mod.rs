//! Unit tests for interview-graph-cli, organized by module.
//!
//! Each submodule documents the behaviour under test.
