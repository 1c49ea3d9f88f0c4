//! Property-style tests for the series encoder.

mod encoder_tests;
