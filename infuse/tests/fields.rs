use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use infuse::{Configurable, ConfigurationError, Injector};
use pretty_assertions::assert_eq;

#[derive(Configurable)]
struct Account {
    #[configure]
    username: String,
}

#[derive(Configurable)]
struct Cache {
    #[configure(optional)]
    cache_dir: PathBuf,
}

#[derive(Configurable, Default)]
struct Sample {
    #[configure]
    string_member: String,
    #[configure]
    int_member: i32,
    #[configure(alias = "user.name")]
    user: String,
    #[configure("shorthand.alias")]
    shorthand: u64,
    #[configure(alias = "   ")]
    blank_alias: bool,
    #[allow(unused)]
    untouched: String,
}

#[derive(Configurable)]
struct Port {
    #[configure]
    port: u16,
}

fn sample_config() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("string_member", "stringValue"),
        ("int_member", "2"),
        ("user.name", "alice"),
        ("shorthand.alias", "7"),
        ("blank_alias", "yes"),
        ("untouched", "changed"),
    ])
}

#[test]
fn test_inject_required_field() {
    let mut account = Account {
        username: String::new(),
    };
    infuse::inject(&mut account, &HashMap::from([("username", "alice")])).unwrap();
    assert_eq!(account.username, "alice");
}

#[test]
fn test_inject_optional_field_keeps_value() {
    let mut cache = Cache {
        cache_dir: PathBuf::from("/var/cache/app"),
    };
    infuse::inject(&mut cache, &HashMap::<String, String>::new()).unwrap();
    assert_eq!(cache.cache_dir, PathBuf::from("/var/cache/app"));
}

#[test]
fn test_inject_optional_field_when_present() {
    let mut cache = Cache {
        cache_dir: PathBuf::from("/var/cache/app"),
    };
    infuse::inject(&mut cache, &[("cache_dir", "/tmp/app")]).unwrap();
    assert_eq!(cache.cache_dir, PathBuf::from("/tmp/app"));
}

#[test]
fn test_inject_map_of_strings() {
    let mut sample = Sample::default();
    Injector::new()
        .inject(&mut sample, &sample_config())
        .unwrap();
    assert_eq!(sample.string_member, "stringValue");
    assert_eq!(sample.int_member, 2);
    assert_eq!(sample.user, "alice");
    assert_eq!(sample.shorthand, 7);
    assert!(sample.blank_alias);
    assert_eq!(sample.untouched, "");
}

#[test]
fn test_inject_btree_map() {
    let config: BTreeMap<String, String> = sample_config()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut sample = Sample::default();
    infuse::inject(&mut sample, &config).unwrap();
    assert_eq!(sample.string_member, "stringValue");
    assert_eq!(sample.int_member, 2);
}

#[test]
fn test_inject_map_of_displayable_values() {
    #[derive(Clone, Copy)]
    enum Key {
        StringMember,
        IntMember,
        User,
        Shorthand,
        BlankAlias,
    }

    impl std::fmt::Display for Key {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(match self {
                Key::StringMember => "string_member",
                Key::IntMember => "int_member",
                Key::User => "user.name",
                Key::Shorthand => "shorthand.alias",
                Key::BlankAlias => "blank_alias",
            })
        }
    }

    type Value = Box<dyn std::fmt::Display>;
    let config: Vec<(Key, Value)> = vec![
        (Key::StringMember, Box::new("stringValue") as Value),
        (Key::IntMember, Box::new(42) as Value),
        (Key::User, Box::new("bob") as Value),
        (Key::Shorthand, Box::new(9u8) as Value),
        (Key::BlankAlias, Box::new(false) as Value),
    ];
    let mut sample = Sample::default();
    infuse::inject(&mut sample, &config).unwrap();
    assert_eq!(sample.string_member, "stringValue");
    assert_eq!(sample.int_member, 42);
    assert_eq!(sample.user, "bob");
    assert_eq!(sample.shorthand, 9);
    assert!(!sample.blank_alias);
}

#[test]
fn test_alias_takes_precedence_over_field_name() {
    let mut config = sample_config();
    config.insert("user", "derived");
    let mut sample = Sample::default();
    infuse::inject(&mut sample, &config).unwrap();
    assert_eq!(sample.user, "alice");
}

#[test]
fn test_alias_is_the_only_name_queried() {
    let mut config = sample_config();
    config.remove("user.name");
    config.insert("user", "derived");
    let mut sample = Sample::default();
    let err = infuse::inject(&mut sample, &config).unwrap_err();
    match err {
        ConfigurationError::NotFound {
            logical, physical, ..
        } => {
            assert_eq!(logical, "user.name");
            assert_eq!(physical, "user.name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_required_field() {
    let mut account = Account {
        username: "nobody".to_string(),
    };
    let err = infuse::inject(&mut account, &HashMap::<String, String>::new()).unwrap_err();
    assert!(matches!(err, ConfigurationError::NotFound { .. }));
    assert!(err.target().ends_with("Account"));
    let message = err.to_string();
    assert!(message.contains("Failed to find configuration for username"));
    assert!(message.contains("Account"));
    assert!(message.contains("HashMap"));
    assert_eq!(account.username, "nobody");
}

#[test]
fn test_field_conversion_failure() {
    let mut port = Port { port: 80 };
    let err = infuse::inject(&mut port, &[("port", "eighty")]).unwrap_err();
    match &err {
        ConfigurationError::Conversion { name, source, .. } => {
            assert_eq!(name, "port");
            assert_eq!(source.value(), "eighty");
            assert_eq!(source.type_name(), "u16");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("to u16"));
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(port.port, 80);
}

#[test]
fn test_fields_before_failure_stay_assigned() {
    let mut config = sample_config();
    config.insert("shorthand.alias", "not a number");
    let mut sample = Sample::default();
    assert!(infuse::inject(&mut sample, &config).is_err());
    assert_eq!(sample.string_member, "stringValue");
    assert_eq!(sample.int_member, 2);
    assert_eq!(sample.user, "alice");
    assert!(!sample.blank_alias);
}

#[test]
fn test_repeated_injection_overwrites() {
    let mut account = Account {
        username: String::new(),
    };
    infuse::inject(&mut account, &[("username", "alice")]).unwrap();
    infuse::inject(&mut account, &[("username", "bob")]).unwrap();
    assert_eq!(account.username, "bob");
}
