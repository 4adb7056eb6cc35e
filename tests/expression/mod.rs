//! Integration tests for the expression evaluator

// Grammar, precedence and syntax errors
mod grammar_tests;

// Compilation against a parameter shape and evaluation
mod evaluation_tests;
