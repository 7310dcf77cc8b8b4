use prost_types::field_descriptor_proto::Type;
use prost_types::FieldDescriptorProto;

use crate::fully_qualified_name::FullyQualifiedName;
use crate::{Error, Result};

/// The Python type a field's wire type maps to, before any imports are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A Python builtin, referenced through its mangled alias.
    Builtin(&'static str),
    /// A name imported from the `typing` module.
    Typing(&'static str),
    /// The paired value type of an enum.
    Enum(FullyQualifiedName),
    /// A message or group type.
    Message(FullyQualifiedName),
}

impl FieldKind {
    /// Classifies a field by its declared type tag.
    ///
    /// Fails when the tag is absent or outside the descriptor type table.
    pub fn of(field: &FieldDescriptorProto) -> Result<FieldKind> {
        let ty = field
            .r#type
            .and_then(|tag| Type::try_from(tag).ok())
            .ok_or_else(|| Error::UnrecognizedType {
                field: field.name().to_owned(),
                type_tag: field.r#type,
            })?;

        Ok(match ty {
            Type::Double | Type::Float => FieldKind::Builtin("float"),
            Type::Int64
            | Type::Uint64
            | Type::Fixed64
            | Type::Sfixed64
            | Type::Sint64
            | Type::Int32
            | Type::Uint32
            | Type::Fixed32
            | Type::Sfixed32
            | Type::Sint32 => FieldKind::Builtin("int"),
            Type::Bool => FieldKind::Builtin("bool"),
            Type::String => FieldKind::Typing("Text"),
            Type::Bytes => FieldKind::Builtin("bytes"),
            Type::Enum => {
                FieldKind::Enum(FullyQualifiedName::from_type_name(field.type_name()).value_type())
            }
            Type::Message | Type::Group => {
                FieldKind::Message(FullyQualifiedName::from_type_name(field.type_name()))
            }
        })
    }
}

/// Returns `true` unless the field holds a message or group.
pub fn is_scalar(field: &FieldDescriptorProto) -> bool {
    !matches!(field.r#type(), Type::Message | Type::Group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(ty: Type, type_name: Option<&str>) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some("f".to_owned()),
            r#type: Some(ty as i32),
            type_name: type_name.map(str::to_owned),
            ..Default::default()
        }
    }

    #[test]
    fn test_scalar_table() {
        let case = |ty: Type, expected: FieldKind| {
            assert_eq!(expected, FieldKind::of(&field(ty, None)).unwrap(), "{:?}", ty);
        };
        case(Type::Double, FieldKind::Builtin("float"));
        case(Type::Float, FieldKind::Builtin("float"));
        for ty in [
            Type::Int64,
            Type::Uint64,
            Type::Fixed64,
            Type::Sfixed64,
            Type::Sint64,
            Type::Int32,
            Type::Uint32,
            Type::Fixed32,
            Type::Sfixed32,
            Type::Sint32,
        ] {
            case(ty, FieldKind::Builtin("int"));
        }
        case(Type::Bool, FieldKind::Builtin("bool"));
        case(Type::String, FieldKind::Typing("Text"));
        case(Type::Bytes, FieldKind::Builtin("bytes"));
    }

    #[test]
    fn test_references() {
        assert_eq!(
            FieldKind::Enum(FullyQualifiedName::from_type_name(".pkg.ColorValue")),
            FieldKind::of(&field(Type::Enum, Some(".pkg.Color"))).unwrap()
        );
        assert_eq!(
            FieldKind::Message(FullyQualifiedName::from_type_name(".pkg.M")),
            FieldKind::of(&field(Type::Message, Some(".pkg.M"))).unwrap()
        );
        assert_eq!(
            FieldKind::Message(FullyQualifiedName::from_type_name(".pkg.G")),
            FieldKind::of(&field(Type::Group, Some(".pkg.G"))).unwrap()
        );
        assert!(!is_scalar(&field(Type::Group, Some(".pkg.G"))));
        assert!(is_scalar(&field(Type::Enum, Some(".pkg.Color"))));
    }

    #[test]
    fn test_unrecognized_type() {
        let mut bogus = field(Type::Int32, None);
        bogus.r#type = Some(99);
        let err = FieldKind::of(&bogus).unwrap_err();
        assert_eq!("unrecognized type Some(99) on field 'f'", err.to_string());

        bogus.r#type = None;
        assert!(matches!(
            FieldKind::of(&bogus),
            Err(Error::UnrecognizedType { type_tag: None, .. })
        ));
    }
}
