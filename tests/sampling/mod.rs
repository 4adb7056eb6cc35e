//! Integration tests for plot sampling


// Seed formulas sampled over their default ranges
mod seed_sampling_tests;
