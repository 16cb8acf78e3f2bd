//! Unit tests for Options and OptionName

use core_types::{OptionName, Options, LANGUAGE_GLOBALS, WEB_GLOBALS};

#[test]
fn test_default_options_are_all_off() {
    let options = Options::default();
    assert_eq!(options.enabled().count(), 0);
    assert_eq!(options.fudge(), 0);
}

#[test]
fn test_from_map_ignores_unknown_names() {
    let options = Options::from_map([("es6", true), ("fudge", true)]);
    assert!(options.fudge);
    assert_eq!(options.fudge(), 1);
    assert_eq!(options.enabled().count(), 1);
}

#[test]
fn test_set_and_get_agree() {
    let mut options = Options::default();
    for name in OptionName::ALL {
        options.set(*name, true);
        assert!(options.get(*name), "{name}");
    }
    assert_eq!(options.enabled().count(), OptionName::ALL.len());
}

#[test]
fn test_option_name_display() {
    assert_eq!(OptionName::Getset.to_string(), "getset");
    assert!("Getset".parse::<OptionName>().is_err());
}

#[test]
fn test_global_tables() {
    assert!(LANGUAGE_GLOBALS.contains(&"Array"));
    assert!(!LANGUAGE_GLOBALS.contains(&"window"));
    assert!(WEB_GLOBALS.contains(&"fetch"));
    assert_eq!(OptionName::Global.preset_globals(), vec!["globalThis"]);
    assert!(OptionName::Devel.preset_globals().contains(&"console"));
    assert!(OptionName::White.preset_globals().is_empty());
}
