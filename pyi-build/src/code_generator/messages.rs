use prost_types::DescriptorProto;

use super::*;
use crate::ident::is_reserved;

impl CodeGenerator<'_> {
    /// Writes message classes, recursing into nested enums and messages. `prefix` is the dotted
    /// path of the enclosing message, if any, relative to the file (e.g. `Outer.`).
    pub(super) fn push_messages(
        &mut self,
        messages: &[DescriptorProto],
        prefix: &str,
    ) -> Result<()> {
        let message_class = self.import("google.protobuf.message", "Message");

        for desc in messages.iter().filter(|desc| !is_reserved(desc.name())) {
            debug!("  message: {:?}", desc.name());

            let qualified_name = format!("{}{}", prefix, desc.name());
            self.push_line(format!("class {}({}):", desc.name(), message_class));
            self.indented(|code_gen| code_gen.push_message_body(desc, &qualified_name))?;

            self.push_line(type_alias(desc.name()));
            self.push_line("");
        }
        Ok(())
    }

    fn push_message_body(&mut self, desc: &DescriptorProto, qualified_name: &str) -> Result<()> {
        let descriptor = self.import("google.protobuf.descriptor", "Descriptor");
        self.push_line(format!("DESCRIPTOR: {} = ...", descriptor));

        let nested_prefix = format!("{}.", qualified_name);
        self.push_enums(&desc.enum_type, &nested_prefix)?;
        self.push_messages(&desc.nested_type, &nested_prefix)?;

        let fields: Vec<&FieldDescriptorProto> = desc
            .field
            .iter()
            .filter(|field| !is_reserved(field.name()))
            .collect();
        let (scalar_fields, message_fields) = partition_scalar(&fields);

        for field in scalar_fields {
            self.push_scalar_field(field)?;
        }
        self.push_line("");

        for field in message_fields {
            self.push_message_field(field)?;
            self.push_line("");
        }

        self.push_constructor(&fields)?;
        self.push_presence_methods(desc)
    }

    fn push_scalar_field(&mut self, field: &FieldDescriptorProto) -> Result<()> {
        let ty = self.python_type(field)?;
        debug!("    field: {:?}, type: {:?}", field.name(), ty);

        if is_repeated(field) {
            let container = self.import(
                "google.protobuf.internal.containers",
                "RepeatedScalarFieldContainer",
            );
            self.push_line(format!("{}: {}[{}] = ...", field.name(), container, ty));
        } else {
            self.push_line(format!("{}: {} = ...", field.name(), ty));
        }
        Ok(())
    }

    /// Message fields are exposed as read-only properties: they are mutated in place rather than
    /// assigned.
    fn push_message_field(&mut self, field: &FieldDescriptorProto) -> Result<()> {
        self.push_line("@property");

        if let Some((key_type, value_type)) = self.map_types(field)? {
            debug!(
                "    map field: {:?}, key type: {:?}, value type: {:?}",
                field.name(),
                key_type,
                value_type
            );
            let container = self.import("typing", "MutableMapping");
            self.push_line(format!(
                "def {}(self) -> {}[{}, {}]: ...",
                field.name(),
                container,
                key_type,
                value_type
            ));
            return Ok(());
        }

        let ty = self.python_type(field)?;
        debug!("    field: {:?}, type: {:?}", field.name(), ty);
        if is_repeated(field) {
            let container = self.import(
                "google.protobuf.internal.containers",
                "RepeatedCompositeFieldContainer",
            );
            self.push_line(format!(
                "def {}(self) -> {}[{}]: ...",
                field.name(),
                container,
                ty
            ));
        } else {
            self.push_line(format!("def {}(self) -> {}: ...", field.name(), ty));
        }
        Ok(())
    }

    fn push_constructor(&mut self, fields: &[&FieldDescriptorProto]) -> Result<()> {
        self.push_line("def __init__(self,");
        self.indented(|code_gen| {
            if !fields.is_empty() {
                // Only keyword arguments are accepted.
                code_gen.push_line("*,");
            }
            for field in fields {
                let param_type = code_gen.constructor_type(field)?;
                let optional = code_gen.import("typing", "Optional");
                code_gen.push_line(format!(
                    "{} : {}[{}] = None,",
                    field.name(),
                    optional,
                    param_type
                ));
            }
            code_gen.push_line(") -> None: ...");
            Ok(())
        })
    }

    fn constructor_type(&mut self, field: &FieldDescriptorProto) -> Result<String> {
        if let Some((key_type, value_type)) = self.map_types(field)? {
            let mapping = self.import("typing", "Mapping");
            return Ok(format!("{}[{}, {}]", mapping, key_type, value_type));
        }

        let ty = self.python_type(field)?;
        if is_repeated(field) {
            let iterable = self.import("typing", "Iterable");
            Ok(format!("{}[{}]", iterable, ty))
        } else {
            Ok(ty)
        }
    }
}
