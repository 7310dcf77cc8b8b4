use std::collections::{HashMap, HashSet};

use log::trace;
use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};

use crate::fully_qualified_name::FullyQualifiedName;
use crate::{Error, Result};

/// `DescriptorIndex` records every message and enum of a request by fully qualified name.
///
/// Field and method type references are always fully qualified, so the index is what lets a
/// reference be traced back to the file that defines it, whichever file is being generated.
/// The index only borrows from the request and is never mutated once built.
#[derive(Debug)]
pub struct DescriptorIndex<'a> {
    messages: HashMap<String, &'a DescriptorProto>,
    owners: HashMap<String, &'a FileDescriptorProto>,
    definitions: HashSet<String>,
}

impl<'a> DescriptorIndex<'a> {
    pub fn new(
        files: impl IntoIterator<Item = &'a FileDescriptorProto>,
    ) -> Result<DescriptorIndex<'a>> {
        let mut index = DescriptorIndex {
            messages: HashMap::new(),
            owners: HashMap::new(),
            definitions: HashSet::new(),
        };

        for file in files {
            let root = FullyQualifiedName::package_root(file.package());
            index.add_messages(&root, &file.message_type, file)?;
            index.add_enums(&root, &file.enum_type, file)?;
        }

        Ok(index)
    }

    fn add_messages(
        &mut self,
        parent: &FullyQualifiedName,
        messages: &'a [DescriptorProto],
        file: &'a FileDescriptorProto,
    ) -> Result<()> {
        for message in messages {
            let name = parent.join(message.name());
            trace!("index message: {}", name);
            self.insert_owner(&name, file)?;
            self.messages.insert(name.as_ref().to_owned(), message);

            self.add_messages(&name, &message.nested_type, file)?;
            self.add_enums(&name, &message.enum_type, file)?;
        }
        Ok(())
    }

    fn add_enums(
        &mut self,
        parent: &FullyQualifiedName,
        enums: &'a [EnumDescriptorProto],
        file: &'a FileDescriptorProto,
    ) -> Result<()> {
        for desc in enums {
            let name = parent.join(desc.name());
            trace!("index enum: {}", name);
            self.insert_owner(&name, file)?;
            // The synthetic value type may legitimately share its name with a real message.
            self.owners
                .entry(name.value_type().as_ref().to_owned())
                .or_insert(file);
        }
        Ok(())
    }

    fn insert_owner(
        &mut self,
        name: &FullyQualifiedName,
        file: &'a FileDescriptorProto,
    ) -> Result<()> {
        if !self.definitions.insert(name.as_ref().to_owned()) {
            return Err(Error::DuplicateName(name.as_ref().to_owned()));
        }
        // Replaces any synthetic enum value type entry of the same name.
        self.owners.insert(name.as_ref().to_owned(), file);
        Ok(())
    }

    /// Returns the message defined under the fully qualified name.
    pub fn message(&self, fq_name: &str) -> Option<&'a DescriptorProto> {
        self.messages.get(fq_name).copied()
    }

    /// Returns the file defining the fully qualified message, enum, or enum value type name.
    pub fn owner(&self, fq_name: &str) -> Result<&'a FileDescriptorProto> {
        self.owners
            .get(fq_name)
            .copied()
            .ok_or_else(|| Error::UnresolvedType(fq_name.to_owned()))
    }

    /// Returns `true` if the named message is a synthesized map entry.
    pub fn is_map_entry(&self, fq_name: &str) -> bool {
        self.message(fq_name)
            .and_then(|message| message.options.as_ref())
            .map_or(false, |options| options.map_entry())
    }
}

#[cfg(test)]
mod tests {
    use prost_types::MessageOptions;

    use super::*;

    fn message(name: &str, nested_type: Vec<DescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_owned()),
            nested_type,
            ..Default::default()
        }
    }

    fn enumeration(name: &str) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(name.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_nested_and_cross_file_names() {
        let mut outer = message("Outer", vec![message("Middle", vec![message("Inner", vec![])])]);
        outer.enum_type.push(enumeration("Kind"));
        let a = FileDescriptorProto {
            name: Some("a.proto".to_owned()),
            package: Some("pkg".to_owned()),
            message_type: vec![outer],
            ..Default::default()
        };
        let b = FileDescriptorProto {
            name: Some("b.proto".to_owned()),
            message_type: vec![message("Top", vec![])],
            enum_type: vec![enumeration("Color")],
            ..Default::default()
        };
        let files = [a, b];
        let index = DescriptorIndex::new(&files).unwrap();

        assert_eq!("a.proto", index.owner(".pkg.Outer").unwrap().name());
        assert_eq!("a.proto", index.owner(".pkg.Outer.Middle.Inner").unwrap().name());
        assert_eq!("a.proto", index.owner(".pkg.Outer.Kind").unwrap().name());
        assert_eq!("a.proto", index.owner(".pkg.Outer.KindValue").unwrap().name());
        assert_eq!("b.proto", index.owner(".Top").unwrap().name());
        assert_eq!("b.proto", index.owner(".ColorValue").unwrap().name());
        assert_eq!("Inner", index.message(".pkg.Outer.Middle.Inner").unwrap().name());
        assert!(index.message(".pkg.Outer.Kind").is_none());

        assert!(matches!(
            index.owner(".pkg.Missing"),
            Err(Error::UnresolvedType(name)) if name == ".pkg.Missing"
        ));
    }

    #[test]
    fn test_map_entry() {
        let mut entry = message("TagsEntry", vec![]);
        entry.options = Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        });
        let file = FileDescriptorProto {
            name: Some("m.proto".to_owned()),
            message_type: vec![message("M", vec![entry])],
            ..Default::default()
        };
        let files = [file];
        let index = DescriptorIndex::new(&files).unwrap();
        assert!(index.is_map_entry(".M.TagsEntry"));
        assert!(!index.is_map_entry(".M"));
        assert!(!index.is_map_entry(".Nope"));
    }

    #[test]
    fn test_duplicate_name() {
        let file = FileDescriptorProto {
            name: Some("d.proto".to_owned()),
            message_type: vec![message("Dup", vec![])],
            enum_type: vec![enumeration("Dup")],
            ..Default::default()
        };
        let files = [file];
        let err = DescriptorIndex::new(&files).unwrap_err();
        assert_eq!("duplicate definition of '.Dup'", err.to_string());
    }

    #[test]
    fn test_message_shadowing_enum_value_type() {
        let file = FileDescriptorProto {
            name: Some("s.proto".to_owned()),
            enum_type: vec![enumeration("Color")],
            message_type: vec![message("ColorValue", vec![])],
            ..Default::default()
        };
        let files = [file];
        let index = DescriptorIndex::new(&files).unwrap();
        assert!(index.message(".ColorValue").is_some());
    }
}
