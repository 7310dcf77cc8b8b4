#![doc(html_root_url = "https://docs.rs/pyi-build/0.1.0")]

//! `pyi-build` generates [mypy] type stubs (`.pyi` files) for the Python code produced by
//! `protoc --python_out` and the gRPC Python plugin.
//!
//! The Python generated code builds its classes at runtime from descriptors, so a type checker
//! sees nothing but untyped attributes. The stubs produced here describe every message, enum,
//! extension and service of a `.proto` file with precise types: scalar attributes, read-only
//! container properties, keyword-only constructors, and string-literal typed `HasField`,
//! `ClearField` and `WhichOneof` methods.
//!
//! The crate is normally driven through the `protoc-gen-mypy` and `protoc-gen-mypy_grpc`
//! plugins, but it can equally be used on a decoded [`CodeGeneratorRequest`]:
//!
//! ```rust,ignore
//! use pyi_build::{Config, Target};
//!
//! let response = Config::new_from_opts(request.parameter())
//!     .compile_request(&request, Target::Messages)?;
//! ```
//!
//! For a file `foo/bar.proto` declaring
//!
//! ```proto
//! syntax = "proto3";
//!
//! package snazzy;
//!
//! message Shirt {
//!   string color = 1;
//!   repeated int32 sizes = 2;
//! }
//! ```
//!
//! the generated `foo/bar_pb2.pyi` contains (imports elided):
//!
//! ```text
//! class Shirt(google___protobuf___message___Message):
//!     DESCRIPTOR: google___protobuf___descriptor___Descriptor = ...
//!     color: typing___Text = ...
//!     sizes: google___protobuf___internal___containers___RepeatedScalarFieldContainer[builtin___int] = ...
//!
//!     def __init__(self,
//!         *,
//!         color : typing___Optional[typing___Text] = None,
//!         sizes : typing___Optional[typing___Iterable[builtin___int]] = None,
//!         ) -> None: ...
//!     def ClearField(self, field_name: typing_extensions___Literal[u"color",b"color",u"sizes",b"sizes"]) -> None: ...
//! type___Shirt = Shirt
//! ```
//!
//! [mypy]: https://mypy-lang.org

mod code_generator;
mod context;
mod descriptor_index;
mod error;
mod fully_qualified_name;
mod ident;
mod imports;
mod resolver;
mod type_mapper;

use log::info;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::code_generator::CodeGenerator;
use crate::context::Context;
use crate::ident::output_file_name;

pub use crate::error::{Error, Result};

// Split so that tooling scanning this source does not consider it generated.
const GENERATED: &str = concat!("@ge", "nerated");

/// The kind of stub file to generate for each requested `.proto` file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Message, enum and extension stubs for the `_pb2` module.
    Messages,
    /// Servicer and stub classes for the `_pb2_grpc` module.
    Grpc,
}

impl Target {
    /// The suffix replacing `.proto` in output file names.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Target::Messages => "_pb2.pyi",
            Target::Grpc => "_pb2_grpc.pyi",
        }
    }
}

/// Configuration options for stub generation.
#[derive(Clone, Debug, Default)]
pub struct Config {
    quiet: bool,
}

impl Config {
    /// Creates a new configuration with default options.
    pub fn new() -> Self {
        Config::default()
    }

    /// Creates a configuration from the comma separated plugin parameter passed by `protoc`
    /// (`--mypy_out=quiet:out_dir`). Unknown options are ignored.
    pub fn new_from_opts(opts: &str) -> Self {
        let mut config = Config::new();
        for opt in opts.split(',').map(str::trim) {
            match opt {
                "quiet" => {
                    config.quiet(true);
                }
                "" => {}
                _ => info!("ignoring unknown option: {}", opt),
            }
        }
        config
    }

    /// Suppresses the per-file `Writing mypy to ...` diagnostics of the plugins.
    pub fn quiet(&mut self, quiet: bool) -> &mut Self {
        self.quiet = quiet;
        self
    }

    /// Returns `true` if per-file diagnostics are suppressed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Generates stubs for every file named in `file_to_generate`.
    ///
    /// All files of the request take part in type resolution, including the ones which are not
    /// generated. Any error aborts the whole request: no partial response is produced.
    pub fn compile_request(
        &self,
        request: &CodeGeneratorRequest,
        target: Target,
    ) -> Result<CodeGeneratorResponse> {
        let context = Context::new(&request.proto_file)?;

        let mut response = CodeGeneratorResponse {
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        };

        for name in &request.file_to_generate {
            let file = context.file(name)?;
            let body = match target {
                Target::Messages => CodeGenerator::generate(&context, file)?,
                Target::Grpc => CodeGenerator::generate_grpc(&context, file)?,
            };
            let output_name = output_file_name(file.name(), target.file_suffix())?;
            info!("generated {} from {}", output_name, file.name());

            response.file.push(File {
                name: Some(output_name),
                content: Some(format!(
                    "# {} by protoc-gen-mypy.  Do not edit!\n{}",
                    GENERATED, body
                )),
                ..Default::default()
            });
        }

        Ok(response)
    }
}
