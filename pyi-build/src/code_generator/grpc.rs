use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

use super::*;
use crate::ident::{is_reserved, sibling_module};

impl CodeGenerator<'_> {
    /// Writes the gRPC servicer and stub classes of a file.
    ///
    /// The `_pb2_grpc` module lives next to the `_pb2` module of the same file, whose names are
    /// re-exported through a relative star import.
    pub(super) fn push_grpc_services(&mut self, services: &[ServiceDescriptorProto]) -> Result<()> {
        let messages_module = sibling_module(self.file.name())?;
        self.push_line(format!("from .{} import *", messages_module));

        for service in services.iter().filter(|service| !is_reserved(service.name())) {
            debug!("  grpc service: {:?}", service.name());

            let meta = self.import("abc", "ABCMeta");
            self.push_line(format!("class {}Servicer(metaclass={}):", service.name(), meta));
            self.indented(|code_gen| code_gen.push_servicer_methods(service))?;
            self.push_line("");

            self.push_line(format!("class {}Stub:", service.name()));
            self.indented(|code_gen| {
                let channel = code_gen.import("grpc", "Channel");
                code_gen.push_line(format!(
                    "def __init__(self, channel: {}) -> None: ...",
                    channel
                ));
                code_gen.push_stub_methods(service)
            })?;
            self.push_line("");
        }
        Ok(())
    }

    fn grpc_methods<'s>(service: &'s ServiceDescriptorProto) -> Vec<&'s MethodDescriptorProto> {
        service
            .method
            .iter()
            .filter(|method| !is_reserved(method.name()))
            .collect()
    }

    /// The return type of a method: the output message, or a generator of output messages for
    /// server streaming methods.
    fn grpc_output_type(&mut self, method: &MethodDescriptorProto) -> Result<String> {
        let output_type =
            self.import_message(&FullyQualifiedName::from_type_name(method.output_type()))?;
        if method.server_streaming() {
            let generator = self.import("typing", "Generator");
            Ok(format!("{}[{}, None, None]", generator, output_type))
        } else {
            Ok(output_type)
        }
    }

    fn push_servicer_methods(&mut self, service: &ServiceDescriptorProto) -> Result<()> {
        let methods = Self::grpc_methods(service);
        if methods.is_empty() {
            self.push_line("pass");
            self.push_line("");
        }

        for method in methods {
            debug!(
                "  grpc method: {:?}, client streaming: {}, server streaming: {}",
                method.name(),
                method.client_streaming(),
                method.server_streaming()
            );

            let abstract_method = self.import("abc", "abstractmethod");
            self.push_line(format!("@{}", abstract_method));
            self.push_line(format!("def {}(self,", method.name()));
            self.indented(|code_gen| {
                let input_type = code_gen
                    .import_message(&FullyQualifiedName::from_type_name(method.input_type()))?;
                code_gen.push_line(format!("request: {},", input_type));
                let context = code_gen.import("grpc", "ServicerContext");
                code_gen.push_line(format!("context: {},", context));
                Ok(())
            })?;
            let output_type = self.grpc_output_type(method)?;
            self.push_line(format!(") -> {}: ...", output_type));
            self.push_line("");
        }
        Ok(())
    }

    fn push_stub_methods(&mut self, service: &ServiceDescriptorProto) -> Result<()> {
        let methods = Self::grpc_methods(service);
        if methods.is_empty() {
            self.push_line("pass");
            self.push_line("");
        }

        for method in methods {
            self.push_line(format!("def {}(self,", method.name()));
            self.indented(|code_gen| {
                let input_type = code_gen
                    .import_message(&FullyQualifiedName::from_type_name(method.input_type()))?;
                code_gen.push_line(format!("request: {},", input_type));
                Ok(())
            })?;
            let output_type = self.grpc_output_type(method)?;
            self.push_line(format!(") -> {}: ...", output_type));
            self.push_line("");
        }
        Ok(())
    }
}
