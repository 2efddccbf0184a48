//! Integration tests for Harvest-Watch

mod extract_tests;
mod fetch_tests;
