//! Tests for CLI argument parsing and configuration file handling
