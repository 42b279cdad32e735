//! Integration tests for the harvester
//!
//! These tests drive the bridge end to end against a saved archive page and
//! use wiremock to serve pages over HTTP.

mod bridge_tests;
mod loader_tests;
