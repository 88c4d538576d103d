//! Integration tests for Stream-Harvest
//!
//! These tests use wiremock to stand in for catalog sites and exercise the crawl, the
//! resolver and the full pipeline over real HTTP.

mod common;
mod crawl_tests;
mod pipeline_tests;
mod resolve_tests;
