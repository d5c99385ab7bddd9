use std::cell::RefCell;
use std::collections::HashMap;

use infuse::{Configurable, ConfigurationError, configurable};
use pretty_assertions::assert_eq;

#[derive(Configurable, Default)]
#[configure(methods)]
struct Base {
    #[configure]
    base_member: String,
    #[configure(optional)]
    shared: String,
    log: RefCell<Vec<&'static str>>,
    base_calls: usize,
}

#[configurable]
impl Base {
    #[configure]
    fn set_base_value(&mut self, _: String) {
        self.base_calls += 1;
        self.log.borrow_mut().push("base method");
    }
}

#[derive(Configurable, Default)]
#[configure(methods)]
struct Derived {
    #[configure]
    derived_member: String,
    #[configure(base)]
    base: Base,
    derived_calls: usize,
}

#[configurable]
impl Derived {
    #[configure]
    fn set_derived_value(&mut self, _: String) {
        self.derived_calls += 1;
        self.base.log.borrow_mut().push("derived method");
    }
}

fn config() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("base_member", "baseValue"),
        ("shared", "sharedValue"),
        ("derived_member", "derivedValue"),
        ("base_value", "1"),
        ("derived_value", "2"),
    ])
}

#[test]
fn test_inject_base_members() {
    let mut derived = Derived::default();
    infuse::inject(&mut derived, &config()).unwrap();
    assert_eq!(derived.derived_member, "derivedValue");
    assert_eq!(derived.base.base_member, "baseValue");
    assert_eq!(derived.base.shared, "sharedValue");
}

#[test]
fn test_base_methods_invoked_once() {
    let mut derived = Derived::default();
    infuse::inject(&mut derived, &config()).unwrap();
    assert_eq!(derived.derived_calls, 1);
    assert_eq!(derived.base.base_calls, 1);
}

#[test]
fn test_derived_members_before_base() {
    let mut derived = Derived::default();
    infuse::inject(&mut derived, &config()).unwrap();
    assert_eq!(
        *derived.base.log.borrow(),
        vec!["derived method", "base method"]
    );
}

#[test]
fn test_base_failure_after_derived_members() {
    let mut config = config();
    config.remove("base_member");
    let mut derived = Derived::default();
    let err = infuse::inject(&mut derived, &config).unwrap_err();
    match &err {
        ConfigurationError::NotFound { logical, .. } => assert_eq!(logical, "base_member"),
        other => panic!("unexpected error: {other}"),
    }
    // Errors name the injected type, not the declaring base.
    assert!(err.target().ends_with("Derived"));
    assert_eq!(derived.derived_member, "derivedValue");
    assert_eq!(derived.derived_calls, 1);
    assert_eq!(derived.base.base_calls, 0);
}

#[test]
fn test_descriptor_names_base() {
    let descriptor = Derived::descriptor();
    assert!(descriptor.base_type_name().unwrap().ends_with("Base"));
    assert_eq!(
        descriptor.fields().map(|f| f.ident()).collect::<Vec<_>>(),
        vec!["derived_member"]
    );
    assert!(Base::descriptor().base_type_name().is_none());
}

#[derive(Configurable, Default)]
struct Root {
    #[configure(alias = "root.name")]
    name: String,
}

#[derive(Configurable, Default)]
struct Middle {
    #[configure(base)]
    root: Root,
    #[configure(alias = "middle.level")]
    level: u8,
}

#[derive(Configurable, Default)]
struct Leaf {
    #[configure(alias = "leaf.enabled")]
    enabled: bool,
    #[configure(base)]
    middle: Middle,
}

#[test]
fn test_inject_multi_level_chain() {
    let config = [
        ("root.name", "root"),
        ("middle.level", "3"),
        ("leaf.enabled", "on"),
    ];
    let mut leaf = Leaf::default();
    infuse::inject(&mut leaf, &config).unwrap();
    assert!(leaf.enabled);
    assert_eq!(leaf.middle.level, 3);
    assert_eq!(leaf.middle.root.name, "root");
}

#[test]
fn test_inject_base_directly() {
    let mut middle = Middle::default();
    infuse::inject(&mut middle, &[("root.name", "root"), ("middle.level", "1")]).unwrap();
    assert_eq!(middle.level, 1);
    assert_eq!(middle.root.name, "root");
}
