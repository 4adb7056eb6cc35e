//! Integration tests for the catalog and the workbench

// Admission, lookup, search and grouping
mod catalog_tests;
