//! Environment-driven profiles for test suites.

pub mod property_test_profile;
