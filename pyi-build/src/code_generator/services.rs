use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

use super::*;
use crate::ident::is_reserved;

impl CodeGenerator<'_> {
    /// Writes the generic `google.protobuf.service` interfaces, emitted when a file sets the
    /// `py_generic_services` option.
    pub(super) fn push_services(&mut self, services: &[ServiceDescriptorProto]) -> Result<()> {
        for service in services.iter().filter(|service| !is_reserved(service.name())) {
            debug!("  service: {:?}", service.name());

            let base = self.import("google.protobuf.service", "Service");
            let meta = self.import("abc", "ABCMeta");
            self.push_line(format!(
                "class {}({}, metaclass={}):",
                service.name(),
                base,
                meta
            ));
            self.indented(|code_gen| code_gen.push_service_methods(service, true))?;

            self.push_line(format!(
                "class {}_Stub({}):",
                service.name(),
                service.name()
            ));
            self.indented(|code_gen| {
                let channel = code_gen.import("google.protobuf.service", "RpcChannel");
                code_gen.push_line(format!(
                    "def __init__(self, rpc_channel: {}) -> None: ...",
                    channel
                ));
                code_gen.push_service_methods(service, false)
            })?;
        }
        Ok(())
    }

    fn push_service_methods(
        &mut self,
        service: &ServiceDescriptorProto,
        is_abstract: bool,
    ) -> Result<()> {
        let methods: Vec<&MethodDescriptorProto> = service
            .method
            .iter()
            .filter(|method| !is_reserved(method.name()))
            .collect();
        if methods.is_empty() {
            self.push_line("pass");
        }

        for method in methods {
            debug!("  method: {:?}", method.name());

            if is_abstract {
                let abstract_method = self.import("abc", "abstractmethod");
                self.push_line(format!("@{}", abstract_method));
            }
            self.push_line(format!("def {}(self,", method.name()));
            let output_type =
                self.import_message(&FullyQualifiedName::from_type_name(method.output_type()))?;
            self.indented(|code_gen| {
                let controller = code_gen.import("google.protobuf.service", "RpcController");
                code_gen.push_line(format!("rpc_controller: {},", controller));
                let input_type = code_gen
                    .import_message(&FullyQualifiedName::from_type_name(method.input_type()))?;
                code_gen.push_line(format!("request: {},", input_type));
                let optional = code_gen.import("typing", "Optional");
                let callable = code_gen.import("typing", "Callable");
                code_gen.push_line(format!(
                    "done: {}[{}[[{}], None]],",
                    optional, callable, output_type
                ));
                Ok(())
            })?;
            let future = self.import("concurrent.futures", "Future");
            self.push_line(format!(") -> {}[{}]: ...", future, output_type));
        }
        Ok(())
    }
}
