use std::collections::BTreeMap;

use multimap::MultiMap;
use prost_types::field_descriptor_proto::Type;
use prost_types::DescriptorProto;

use super::*;

/// `u"name",b"name"`: the field name methods accept both text and byte strings.
fn text_and_bytes(name: &str) -> String {
    format!("u\"{}\",b\"{}\"", name, name)
}

fn literal_union<'b>(names: impl IntoIterator<Item = &'b str>) -> String {
    names.into_iter().map(text_and_bytes).sorted().join(",")
}

impl CodeGenerator<'_> {
    /// Types the stringly-typed `HasField`, `ClearField` and `WhichOneof` methods of a message as
    /// unions of string literals.
    pub(super) fn push_presence_methods(&mut self, desc: &DescriptorProto) -> Result<()> {
        let oneof_members: MultiMap<i32, &str> = desc
            .field
            .iter()
            .filter_map(|field| field.oneof_index.map(|idx| (idx, field.name())))
            .collect();
        let oneofs: BTreeMap<&str, Vec<&str>> = desc
            .oneof_decl
            .iter()
            .enumerate()
            .map(|(idx, oneof)| {
                let members = oneof_members
                    .get_vec(&(idx as i32))
                    .map(|members| members.iter().copied().sorted().collect())
                    .unwrap_or_default();
                (oneof.name(), members)
            })
            .collect();

        let has_fields: Vec<&str> = desc
            .field
            .iter()
            .filter(|field| self.has_presence(field))
            .map(|field| field.name())
            .chain(oneofs.keys().copied())
            .collect();
        let clear_fields: Vec<&str> = desc
            .field
            .iter()
            .map(|field| field.name())
            .chain(oneofs.keys().copied())
            .collect();

        if !has_fields.is_empty() {
            let literal = self.import("typing_extensions", "Literal");
            let bool_type = self.builtin("bool");
            self.push_line(format!(
                "def HasField(self, field_name: {}[{}]) -> {}: ...",
                literal,
                literal_union(has_fields),
                bool_type
            ));
        }

        if !clear_fields.is_empty() {
            let literal = self.import("typing_extensions", "Literal");
            self.push_line(format!(
                "def ClearField(self, field_name: {}[{}]) -> None: ...",
                literal,
                literal_union(clear_fields)
            ));
        }

        for (oneof, members) in &oneofs {
            if oneofs.len() > 1 {
                let overload = self.import("typing", "overload");
                self.push_line(format!("@{}", overload));
            }
            let literal = self.import("typing_extensions", "Literal");
            self.push_line(format!(
                "def WhichOneof(self, oneof_group: {}[{}]) -> {}[{}]: ...",
                literal,
                text_and_bytes(oneof),
                literal,
                members
                    .iter()
                    .map(|member| format!("\"{}\"", member))
                    .join(",")
            ));
        }

        Ok(())
    }

    /// Returns `true` if `HasField` accepts the field.
    ///
    /// Oneof members always track presence. Otherwise only singular fields do, and in proto3
    /// only singular message fields.
    fn has_presence(&self, field: &FieldDescriptorProto) -> bool {
        field.oneof_index.is_some()
            || (!is_repeated(field)
                && (!self.syntax.has_implicit_presence() || field.r#type() == Type::Message))
    }
}
