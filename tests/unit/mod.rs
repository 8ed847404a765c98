/// Unit tests for the public building blocks
mod basic_tests;
