//! Unit test target for the parser component

mod test_properties;
