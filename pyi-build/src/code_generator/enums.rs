use prost_types::EnumDescriptorProto;

use super::*;
use crate::ident::is_reserved;

impl CodeGenerator<'_> {
    /// Writes enum definitions. `prefix` is the dotted path of the enclosing message, if any,
    /// relative to the file (e.g. `Outer.`).
    pub(super) fn push_enums(&mut self, enums: &[EnumDescriptorProto], prefix: &str) -> Result<()> {
        for desc in enums.iter().filter(|desc| !is_reserved(desc.name())) {
            debug!("  enum: {:?}", desc.name());

            let enum_name = desc.name();
            let value_type = format!("{}Value", enum_name);
            let new_type = self.import("typing", "NewType");
            let int = self.builtin("int");
            self.push_line(format!(
                "{} = {}('{}', {})",
                value_type, new_type, value_type, int
            ));
            self.push_line(type_alias(&value_type));

            let qualified_value_type = format!("{}{}", prefix, value_type);
            self.push_line(format!("{}: _{}", enum_name, enum_name));
            let wrapper = self.import(
                "google.protobuf.internal.enum_type_wrapper",
                "_EnumTypeWrapper",
            );
            self.push_line(format!(
                "class _{}({}[{}]):",
                enum_name, wrapper, qualified_value_type
            ));
            self.indented(|code_gen| {
                let descriptor = code_gen.import("google.protobuf.descriptor", "EnumDescriptor");
                code_gen.push_line(format!("DESCRIPTOR: {} = ...", descriptor));
                code_gen.push_enum_values(desc, &qualified_value_type);
                Ok(())
            })?;

            self.push_enum_values(desc, &qualified_value_type);
            self.push_line(type_alias(enum_name));
            self.push_line("");
        }
        Ok(())
    }

    fn push_enum_values(&mut self, desc: &EnumDescriptorProto, qualified_value_type: &str) {
        for value in desc.value.iter().filter(|value| !is_reserved(value.name())) {
            let cast = self.import("typing", "cast");
            self.push_line(format!(
                "{} = {}({}, {})",
                value.name(),
                cast,
                qualified_value_type,
                value.number()
            ));
        }
    }
}
