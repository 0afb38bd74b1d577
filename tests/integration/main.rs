//! Integration tests for image-grabber
//!
//! These tests use wiremock to stand in for image sites and tempfile for
//! target directories.

mod download_tests;
mod pipeline_tests;
mod source_tests;
