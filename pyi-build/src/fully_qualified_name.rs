use std::fmt;

// Invariant: should always begin with a '.' (dot)
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FullyQualifiedName(String);

impl FullyQualifiedName {
    /// The root scope of a file: `.<package>` or the empty root when no package is declared.
    pub fn package_root(package: &str) -> Self {
        let package = package.trim_matches('.');
        if package.is_empty() {
            Self(String::new())
        } else {
            Self(format!(".{}", package))
        }
    }

    pub fn from_type_name(type_name: &str) -> Self {
        Self(format!(".{}", type_name.trim_start_matches('.')))
    }

    pub fn join(&self, path: &str) -> Self {
        Self(format!("{}.{}", self.0, path))
    }

    /// Appends the `Value` suffix naming an enum's paired value type.
    pub fn value_type(&self) -> Self {
        Self(format!("{}Value", self.0))
    }

    /// Returns the dotted path of this name relative to `package`, or `None` if the name does
    /// not live inside that package.
    pub fn strip_package(&self, package: &str) -> Option<&str> {
        let package = package.trim_matches('.');
        let rest = self.0.strip_prefix('.')?;
        if package.is_empty() {
            return Some(rest);
        }
        rest.strip_prefix(package)?.strip_prefix('.')
    }
}

impl AsRef<str> for FullyQualifiedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
