//! Utility functions for working with Python identifiers and module names.

use crate::{Error, Result};

const PROTO_SUFFIX: &str = ".proto";

/// Returns `true` if the identifier is a Python keyword.
///
/// Declarations named after a keyword cannot be expressed in a stub, so they are left out of the
/// generated output entirely.
pub fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "False"
            | "None"
            | "True"
            | "and"
            | "as"
            | "async"
            | "await"
            | "assert"
            | "break"
            | "class"
            | "continue"
            | "def"
            | "del"
            | "elif"
            | "else"
            | "except"
            | "finally"
            | "for"
            | "from"
            | "global"
            | "if"
            | "import"
            | "in"
            | "is"
            | "lambda"
            | "nonlocal"
            | "not"
            | "or"
            | "pass"
            | "raise"
            | "return"
            | "try"
            | "while"
            | "with"
            | "yield"
    )
}

/// Returns `true` for builtins which only exist on Python 2.
pub fn is_py2_only_builtin(name: &str) -> bool {
    matches!(name, "buffer" | "unicode")
}

/// Mangles a builtin name so that a field of the same name cannot shadow it.
pub fn mangle_builtin(name: &str) -> String {
    format!("builtin___{}", name)
}

/// Mangles a message or enum name for internal references.
///
/// An enum value `Name` may shadow a message or enum named `Name` inside a class body, so local
/// references go through a `type___` prefixed alias.
pub fn mangle_message(name: &str) -> String {
    format!("type___{}", name)
}

/// Strips the `.proto` suffix from a schema file name.
pub fn strip_proto_suffix(file_name: &str) -> Result<&str> {
    file_name
        .strip_suffix(PROTO_SUFFIX)
        .ok_or_else(|| Error::InvalidFileName(file_name.to_owned()))
}

/// The dotted Python module generated for a proto file, e.g. `foo/bar-baz.proto` becomes
/// `foo.bar_baz_pb2`.
pub fn python_module(file_name: &str) -> Result<String> {
    let stem = strip_proto_suffix(file_name)?;
    Ok(format!("{}_pb2", stem.replace('-', "_").replace('/', ".")))
}

/// The output file name for a proto file with the given suffix, e.g. `foo/bar-baz.proto` with
/// `_pb2.pyi` becomes `foo/bar_baz_pb2.pyi`.
pub fn output_file_name(file_name: &str, suffix: &str) -> Result<String> {
    let stem = strip_proto_suffix(file_name)?;
    Ok(format!(
        "{}{}",
        stem.replace('-', "_").replace('.', "/"),
        suffix
    ))
}

/// The module name of a proto file relative to its own package directory, e.g.
/// `foo/bar-baz.proto` becomes `bar_baz_pb2`.
pub fn sibling_module(file_name: &str) -> Result<String> {
    let stem = strip_proto_suffix(file_name)?;
    let base = stem.rsplit('/').next().unwrap_or(stem);
    Ok(format!("{}_pb2", base.replace('-', "_")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_reserved() {
        assert!(is_reserved("class"));
        assert!(is_reserved("None"));
        assert!(is_reserved("async"));
        assert!(!is_reserved("Class"));
        assert!(!is_reserved("none"));
        assert!(!is_reserved("print"));
        assert!(!is_reserved("int"));
    }

    #[test]
    fn test_mangle() {
        assert_eq!("builtin___int", mangle_builtin("int"));
        assert_eq!("type___Outer.Inner", mangle_message("Outer.Inner"));
    }

    #[test]
    fn test_python_module() {
        assert_eq!("foo_pb2", python_module("foo.proto").unwrap());
        assert_eq!("a.b.foo_bar_pb2", python_module("a/b/foo-bar.proto").unwrap());
        assert!(matches!(
            python_module("foo.txt"),
            Err(Error::InvalidFileName(name)) if name == "foo.txt"
        ));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!("p_pb2.pyi", output_file_name("p.proto", "_pb2.pyi").unwrap());
        assert_eq!(
            "a/b/foo_bar_pb2_grpc.pyi",
            output_file_name("a/b/foo-bar.proto", "_pb2_grpc.pyi").unwrap()
        );
        assert_eq!(
            "a/v1/foo_pb2.pyi",
            output_file_name("a/v1.foo.proto", "_pb2.pyi").unwrap()
        );
    }

    #[test]
    fn test_sibling_module() {
        assert_eq!("foo_bar_pb2", sibling_module("a/b/foo-bar.proto").unwrap());
        assert_eq!("foo_pb2", sibling_module("foo.proto").unwrap());
    }
}
