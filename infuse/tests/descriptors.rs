use std::collections::HashMap;

use infuse::{
    Configurable, ConfigurationError, Descriptor, FieldSpec, Injector, MethodSpec, NameResolver,
    ParamSpec, configurable,
};

#[derive(Debug, Default, PartialEq)]
struct Pool {
    url: String,
    min: u32,
    max: u32,
}

impl Pool {
    fn resize(&mut self, min: u32, max: u32) -> Result<(), String> {
        if min > max {
            return Err(format!("min {min} exceeds max {max}"));
        }
        self.min = min;
        self.max = max;
        Ok(())
    }
}

impl Configurable for Pool {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::new()
            .field::<String>(FieldSpec::new("url").alias("pool.url"), |target, value| {
                target.url = value
            })
            .method(
                MethodSpec::new("resize")
                    .param(ParamSpec::of::<u32>().ident("min").default("1"))
                    .param(ParamSpec::of::<u32>().ident("max")),
                |target, args| {
                    let min = args.take()?;
                    let max = args.take()?;
                    target
                        .resize(min, max)
                        .map_err(infuse::InvokeError::failed)
                },
            )
    }
}

#[test]
fn test_manual_descriptor() {
    let mut pool = Pool::default();
    infuse::inject(&mut pool, &[("pool.url", "postgres://db"), ("max", "8")]).unwrap();
    assert_eq!(
        pool,
        Pool {
            url: "postgres://db".to_string(),
            min: 1,
            max: 8,
        }
    );
}

#[test]
fn test_manual_descriptor_method_error() {
    let mut pool = Pool::default();
    let err = infuse::inject(
        &mut pool,
        &[("pool.url", "postgres://db"), ("min", "9"), ("max", "8")],
    )
    .unwrap_err();
    match &err {
        ConfigurationError::Invocation { method, source, .. } => {
            assert_eq!(method, "resize");
            assert_eq!(source.to_string(), "min 9 exceeds max 8");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_descriptor_introspection() {
    let descriptor = Pool::descriptor();
    assert!(descriptor.type_name().ends_with("Pool"));
    assert_eq!(descriptor.base_type_name(), None);

    let fields: Vec<_> = descriptor.fields().cloned().collect();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].ident(), "url");
    assert_eq!(fields[0].alias_name(), Some("pool.url"));
    assert!(!fields[0].is_optional());
    assert_eq!(fields[0].type_name(), std::any::type_name::<String>());

    let method = descriptor.methods().next().unwrap();
    assert_eq!(method.ident(), "resize");
    assert_eq!(method.alias_name(), None);
    assert_eq!(method.params().len(), 2);

    let debug = format!("{descriptor:?}");
    assert!(debug.contains("resize"));
}

#[derive(Configurable, Default)]
#[configure(methods)]
struct Theme {
    #[configure]
    name: String,
    accent: String,
    font_size: u8,
}

#[configurable]
impl Theme {
    #[configure]
    fn with_accent(&mut self, accent: String) {
        self.accent = accent;
    }

    #[allow(non_snake_case)]
    #[configure]
    fn setFontSize(&mut self, size: u8) {
        self.font_size = size;
    }
}

#[test]
fn test_default_resolver() {
    let config = HashMap::from([("name", "dark"), ("with_accent", "red"), ("fontSize", "12")]);
    let mut theme = Theme::default();
    infuse::inject(&mut theme, &config).unwrap();
    assert_eq!(theme.name, "dark");
    assert_eq!(theme.accent, "red");
    assert_eq!(theme.font_size, 12);
}

#[test]
fn test_custom_resolver() {
    let injector = Injector::with_resolver(NameResolver::new().with_prefix("with"));
    let config = HashMap::from([("name", "dark"), ("accent", "blue"), ("fontSize", "14")]);
    let mut theme = Theme::default();
    injector.inject(&mut theme, &config).unwrap();
    assert_eq!(theme.accent, "blue");
    assert_eq!(theme.font_size, 14);
}

#[test]
fn test_resolver_without_prefixes() {
    let injector = Injector::with_resolver(NameResolver::without_prefixes());
    let config = HashMap::from([
        ("name", "dark"),
        ("with_accent", "green"),
        ("setFontSize", "10"),
    ]);
    let mut theme = Theme::default();
    injector.inject(&mut theme, &config).unwrap();
    assert_eq!(theme.accent, "green");
    assert_eq!(theme.font_size, 10);
    assert!(injector.resolver().strip_prefix("set_port") == "set_port");
}

#[test]
fn test_injector_is_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>(_: &T) {}

    let injector = Injector::default();
    assert_send_sync(&injector);
    std::thread::scope(|scope| {
        for url in ["postgres://a", "postgres://b"] {
            let injector = &injector;
            scope.spawn(move || {
                let mut pool = Pool::default();
                injector
                    .inject(&mut pool, &[("pool.url", url), ("max", "2")])
                    .unwrap();
                assert_eq!(pool.url, url);
            });
        }
    });
}

#[derive(Debug, Default, PartialEq)]
struct Endpoint {
    path: String,
    server: Server,
}

#[derive(Debug, Default, PartialEq)]
struct Server {
    host: String,
    port: u16,
}

impl Server {
    fn set_port(&mut self, port: u16) {
        self.port = port;
    }
}

impl Configurable for Server {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::new()
            .field::<String>(FieldSpec::new("host").optional(), |target, value| {
                target.host = value
            })
            .method(
                MethodSpec::new("set_port").param(ParamSpec::of::<u16>().alias("server.port")),
                |target, args| {
                    target.set_port(args.take()?);
                    Ok(())
                },
            )
    }
}

impl Configurable for Endpoint {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::new()
            .field::<String>(FieldSpec::new("path"), |target, value| target.path = value)
            .base::<Server>(|target| &mut target.server)
    }
}

#[test]
fn test_manual_descriptor_with_base() {
    let mut endpoint = Endpoint::default();
    let config = [("path", "/health"), ("host", "localhost"), ("server.port", "8080")];
    infuse::inject(&mut endpoint, &config).unwrap();
    assert_eq!(
        endpoint,
        Endpoint {
            path: "/health".to_string(),
            server: Server {
                host: "localhost".to_string(),
                port: 8080,
            },
        }
    );
    assert!(
        Endpoint::descriptor()
            .base_type_name()
            .unwrap()
            .ends_with("Server")
    );
}

#[derive(Default)]
struct Partial {
    first: String,
}

impl Configurable for Partial {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::new().method(
            MethodSpec::new("set_pair")
                .param(ParamSpec::of::<String>().ident("first"))
                .param(ParamSpec::of::<String>().ident("second")),
            |target, args| {
                target.first = args.take()?;
                Ok(())
            },
        )
    }
}

#[test]
fn test_untaken_arguments_are_reported() {
    let mut partial = Partial::default();
    let err = infuse::inject(&mut partial, &[("first", "a"), ("second", "b")]).unwrap_err();
    match &err {
        ConfigurationError::Invocation { method, source, .. } => {
            assert_eq!(method, "pair");
            assert_eq!(
                source.to_string(),
                "invoker left 1 of 2 declared arguments untaken"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}
