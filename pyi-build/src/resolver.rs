use prost_types::FileDescriptorProto;

use crate::descriptor_index::DescriptorIndex;
use crate::fully_qualified_name::FullyQualifiedName;
use crate::ident::{mangle_message, python_module, strip_proto_suffix};
use crate::{Error, Result};

/// Where a fully qualified type reference lives, relative to the file being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedName {
    /// Defined in the file being generated; the mangled local alias.
    Local(String),
    /// Defined in another file and reached through an import.
    External {
        /// Python module of the defining file, e.g. `foo.bar_pb2`.
        module: String,
        /// Top level name imported from the module.
        symbol: String,
        /// Dotted path below `symbol` for nested types, empty for top level types.
        residual: String,
    },
}

/// Resolves type references for one file, using the request-wide [`DescriptorIndex`].
///
/// Python generated code ignores Protobuf packages: the only thing that matters for a
/// reference is whether it is defined in the current file or must be imported.
pub struct NameResolver<'a> {
    index: &'a DescriptorIndex<'a>,
    file: &'a FileDescriptorProto,
}

impl<'a> NameResolver<'a> {
    pub fn new(index: &'a DescriptorIndex<'a>, file: &'a FileDescriptorProto) -> Self {
        Self { index, file }
    }

    pub fn resolve(&self, pb_ident: &FullyQualifiedName) -> Result<ResolvedName> {
        let owner = self.index.owner(pb_ident.as_ref())?;
        strip_proto_suffix(owner.name())?;

        let relative = pb_ident
            .strip_package(owner.package())
            .ok_or_else(|| Error::UnresolvedType(pb_ident.to_string()))?;

        if owner.name() == self.file.name() {
            return Ok(ResolvedName::Local(mangle_message(relative)));
        }

        let (symbol, residual) = match relative.split_once('.') {
            Some((symbol, residual)) => (symbol, residual),
            None => (relative, ""),
        };

        Ok(ResolvedName::External {
            module: python_module(owner.name())?,
            symbol: symbol.to_owned(),
            residual: residual.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use prost_types::{DescriptorProto, EnumDescriptorProto};

    use super::*;

    fn files() -> Vec<FileDescriptorProto> {
        let nested = DescriptorProto {
            name: Some("Outer".to_owned()),
            nested_type: vec![DescriptorProto {
                name: Some("Inner".to_owned()),
                ..Default::default()
            }],
            enum_type: vec![EnumDescriptorProto {
                name: Some("Kind".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };
        vec![
            FileDescriptorProto {
                name: Some("here.proto".to_owned()),
                package: Some("pkg".to_owned()),
                message_type: vec![nested.clone()],
                ..Default::default()
            },
            FileDescriptorProto {
                name: Some("deps/other-file.proto".to_owned()),
                package: Some("other.pkg".to_owned()),
                message_type: vec![DescriptorProto {
                    name: Some("Other".to_owned()),
                    nested_type: vec![nested],
                    ..Default::default()
                }],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_local() {
        let files = files();
        let index = DescriptorIndex::new(&files).unwrap();
        let resolver = NameResolver::new(&index, &files[0]);

        let case = |pb_ident: &str, expected: &str| {
            assert_eq!(
                ResolvedName::Local(expected.to_owned()),
                resolver
                    .resolve(&FullyQualifiedName::from_type_name(pb_ident))
                    .unwrap()
            );
        };
        case(".pkg.Outer", "type___Outer");
        case(".pkg.Outer.Inner", "type___Outer.Inner");
        case(".pkg.Outer.KindValue", "type___Outer.KindValue");
    }

    #[test]
    fn test_external() {
        let files = files();
        let index = DescriptorIndex::new(&files).unwrap();
        let resolver = NameResolver::new(&index, &files[0]);

        let case = |pb_ident: &str, symbol: &str, residual: &str| {
            assert_eq!(
                ResolvedName::External {
                    module: "deps.other_file_pb2".to_owned(),
                    symbol: symbol.to_owned(),
                    residual: residual.to_owned(),
                },
                resolver
                    .resolve(&FullyQualifiedName::from_type_name(pb_ident))
                    .unwrap()
            );
        };
        case(".other.pkg.Other", "Other", "");
        case(".other.pkg.Other.Outer.Inner", "Other", "Outer.Inner");
        case(".other.pkg.Other.Outer.KindValue", "Other", "Outer.KindValue");
    }

    #[test]
    fn test_unresolved() {
        let files = files();
        let index = DescriptorIndex::new(&files).unwrap();
        let resolver = NameResolver::new(&index, &files[0]);
        assert!(matches!(
            resolver.resolve(&FullyQualifiedName::from_type_name(".pkg.Nope")),
            Err(Error::UnresolvedType(_))
        ));
    }
}
