use itertools::Itertools;
use log::debug;
use prost_types::field_descriptor_proto::Label;
use prost_types::{FieldDescriptorProto, FileDescriptorProto};

use crate::context::Context;
use crate::descriptor_index::DescriptorIndex;
use crate::fully_qualified_name::FullyQualifiedName;
use crate::ident::mangle_message;
use crate::imports::ImportRegistry;
use crate::resolver::{NameResolver, ResolvedName};
use crate::type_mapper::{is_scalar, FieldKind};
use crate::{Error, Result};

mod enums;
mod grpc;
mod messages;
mod presence;
mod services;

mod syntax;
use syntax::Syntax;

/// Generates the stub text for a single `.proto` file.
///
/// A `CodeGenerator` owns all of the mutable state of one file's pass: the imports it has
/// referenced, the lines written so far, and the current nesting depth. Nothing is shared
/// between passes except the read-only [`DescriptorIndex`].
pub struct CodeGenerator<'a> {
    index: &'a DescriptorIndex<'a>,
    file: &'a FileDescriptorProto,
    resolver: NameResolver<'a>,
    syntax: Syntax,
    imports: ImportRegistry,
    depth: usize,
    lines: Vec<String>,
}

impl<'a> CodeGenerator<'a> {
    fn new(context: &'a Context<'a>, file: &'a FileDescriptorProto) -> Self {
        let index = context.index();
        Self {
            index,
            file,
            resolver: NameResolver::new(index, file),
            syntax: file.syntax.as_deref().into(),
            imports: ImportRegistry::new(),
            depth: 0,
            lines: Vec::new(),
        }
    }

    /// Generates the message stubs (`_pb2.pyi`) for a file.
    pub fn generate(context: &'a Context<'a>, file: &'a FileDescriptorProto) -> Result<String> {
        let mut code_gen = CodeGenerator::new(context, file);

        debug!(
            "file: {:?}, package: {:?}, syntax: {:?}",
            file.name(),
            file.package(),
            code_gen.syntax
        );

        code_gen.push_module_attributes();
        code_gen.push_enums(&file.enum_type, "")?;
        code_gen.push_messages(&file.message_type, "")?;
        code_gen.push_extensions(&file.extension);
        if file
            .options
            .as_ref()
            .map_or(false, |options| options.py_generic_services())
        {
            code_gen.push_services(&file.service)?;
        }

        Ok(code_gen.finish())
    }

    /// Generates the gRPC service stubs (`_pb2_grpc.pyi`) for a file.
    pub fn generate_grpc(
        context: &'a Context<'a>,
        file: &'a FileDescriptorProto,
    ) -> Result<String> {
        let mut code_gen = CodeGenerator::new(context, file);

        debug!("grpc file: {:?}, package: {:?}", file.name(), file.package());

        code_gen.push_grpc_services(&file.service)?;

        Ok(code_gen.finish())
    }

    fn finish(self) -> String {
        self.imports
            .render()
            .into_iter()
            .chain(self.lines)
            .join("\n")
    }

    fn push_line(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines
                .push(format!("{}{}", "    ".repeat(self.depth), line));
        }
    }

    /// Runs `f` one nesting level deeper. The previous depth is restored on return, whether or
    /// not `f` succeeded.
    fn indented<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn import(&mut self, module: &str, symbol: &str) -> String {
        self.imports.request(module, symbol)
    }

    fn builtin(&mut self, name: &str) -> String {
        self.imports.builtin(name)
    }

    /// Returns a reference to a message or enum type, importing its module when it is defined
    /// in another file.
    fn import_message(&mut self, pb_ident: &FullyQualifiedName) -> Result<String> {
        match self.resolver.resolve(pb_ident)? {
            ResolvedName::Local(name) => Ok(name),
            ResolvedName::External {
                module,
                symbol,
                residual,
            } => {
                let alias = self.import(&module, &symbol);
                if residual.is_empty() {
                    Ok(alias)
                } else {
                    Ok(format!("{}.{}", alias, residual))
                }
            }
        }
    }

    fn python_type(&mut self, field: &FieldDescriptorProto) -> Result<String> {
        match FieldKind::of(field)? {
            FieldKind::Builtin(name) => Ok(self.builtin(name)),
            FieldKind::Typing(name) => Ok(self.import("typing", name)),
            FieldKind::Enum(pb_ident) | FieldKind::Message(pb_ident) => {
                self.import_message(&pb_ident)
            }
        }
    }

    /// Returns the key and value types when the field is a map, i.e. a repeated field of a
    /// synthesized map entry message.
    fn map_types(&mut self, field: &FieldDescriptorProto) -> Result<Option<(String, String)>> {
        if field.label() != Label::Repeated || !self.index.is_map_entry(field.type_name()) {
            return Ok(None);
        }
        let entry = self
            .index
            .message(field.type_name())
            .ok_or_else(|| Error::UnresolvedType(field.type_name().to_owned()))?;
        match &entry.field[..] {
            [key, value] if key.name() == "key" && value.name() == "value" => {
                let key_type = self.python_type(key)?;
                let value_type = self.python_type(value)?;
                Ok(Some((key_type, value_type)))
            }
            _ => Err(Error::MalformedMapEntry(field.type_name().to_owned())),
        }
    }

    fn push_module_attributes(&mut self) {
        let descriptor = self.import("google.protobuf.descriptor", "FileDescriptor");
        self.push_line(format!("DESCRIPTOR: {} = ...", descriptor));
        self.push_line("");
    }

    fn push_extensions(&mut self, extensions: &[FieldDescriptorProto]) {
        if extensions.is_empty() {
            return;
        }
        let field_descriptor = self.import("google.protobuf.descriptor", "FieldDescriptor");
        for extension in extensions {
            debug!("  extension: {:?}", extension.name());
            self.push_line(format!("{}: {} = ...", extension.name(), field_descriptor));
            self.push_line("");
        }
    }
}

/// Returns `true` if the field is repeated.
fn is_repeated(field: &FieldDescriptorProto) -> bool {
    field.label() == Label::Repeated
}

fn partition_scalar<'b>(
    fields: &[&'b FieldDescriptorProto],
) -> (Vec<&'b FieldDescriptorProto>, Vec<&'b FieldDescriptorProto>) {
    fields.iter().copied().partition(|field| is_scalar(field))
}

fn type_alias(name: &str) -> String {
    format!("{} = {}", mangle_message(name), name)
}
