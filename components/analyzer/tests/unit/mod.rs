//! Unit test target for the analyzer component

mod test_properties;
mod test_scenarios;
