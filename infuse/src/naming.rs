use std::borrow::Cow;

/// Derives logical configuration names for fields, methods and method
/// parameters.
///
/// An explicit alias always wins when its trimmed value is not blank. Without
/// an alias, fields use their identifier and methods use their identifier with
/// a setter prefix removed.
///
/// # Examples
///
/// ```rust
/// use infuse::NameResolver;
///
/// let resolver = NameResolver::default();
/// assert_eq!(resolver.field_name("username", None), "username");
/// assert_eq!(resolver.field_name("username", Some(" user.name ")), "user.name");
/// assert_eq!(resolver.method_name("set_port", None), "port");
/// assert_eq!(resolver.method_name("setCacheDir", None), "cacheDir");
/// ```
#[derive(Clone, Debug)]
pub struct NameResolver {
    prefixes: Vec<Cow<'static, str>>,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self {
            prefixes: vec![Cow::Borrowed("set")],
        }
    }
}

impl NameResolver {
    /// Creates a resolver that strips the default `set` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver that recognizes no setter prefixes at all.
    pub fn without_prefixes() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Adds another verb prefix recognized on method identifiers, such as
    /// `with` or `configure`.
    pub fn with_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Returns the trimmed alias when present and not blank, otherwise the
    /// implied name.
    pub fn pick(implied: &str, alias: Option<&str>) -> String {
        match alias.map(str::trim) {
            Some(alias) if !alias.is_empty() => alias.to_owned(),
            _ => implied.to_owned(),
        }
    }

    /// Resolves the logical name of a field.
    pub fn field_name(&self, ident: &str, alias: Option<&str>) -> String {
        Self::pick(ident, alias)
    }

    /// Resolves the logical name of a method.
    pub fn method_name(&self, ident: &str, alias: Option<&str>) -> String {
        match alias.map(str::trim) {
            Some(alias) if !alias.is_empty() => alias.to_owned(),
            _ => self.strip_prefix(ident).into_owned(),
        }
    }

    /// Resolves the logical name of a method parameter.
    ///
    /// The parameter's own alias wins. Otherwise the only parameter of a
    /// method shares the method's resolved name, and parameters of
    /// multi-parameter methods use their own identifier.
    pub fn param_name(
        &self,
        method_name: &str,
        ident: Option<&str>,
        alias: Option<&str>,
        sole: bool,
    ) -> String {
        let implied = match ident {
            Some(ident) if !sole => ident,
            _ => method_name,
        };
        Self::pick(implied, alias)
    }

    /// Removes a recognized verb prefix from a method identifier.
    ///
    /// Snake case identifiers lose `<prefix>_` (`set_port` → `port`). Camel
    /// case identifiers lose `<prefix>` when it is followed by an uppercase
    /// letter (`setPort` → `port`). Either way the remaining name starts with
    /// a lower-case letter, so `set_Port` also becomes `port`.
    /// Identifiers without a recognized prefix are returned unchanged.
    pub fn strip_prefix<'a>(&self, ident: &'a str) -> Cow<'a, str> {
        for prefix in &self.prefixes {
            let Some(rest) = ident.strip_prefix(prefix.as_ref()) else {
                continue;
            };
            if let Some(rest) = rest.strip_prefix('_')
                && !rest.is_empty()
            {
                return decapitalize(rest);
            }
            if rest.starts_with(char::is_uppercase) {
                return decapitalize(rest);
            }
        }
        Cow::Borrowed(ident)
    }
}

fn decapitalize(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            Cow::Owned(first.to_lowercase().collect::<String>() + chars.as_str())
        }
        _ => Cow::Borrowed(name),
    }
}
