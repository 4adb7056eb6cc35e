//! Integration tests for the assistant exchange

// Full turns against a scripted service
mod exchange_tests;
