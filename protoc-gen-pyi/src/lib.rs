//! Shared driver of the `protoc-gen-mypy` and `protoc-gen-mypy_grpc` plugins.
//!
//! `protoc` writes a serialized `CodeGeneratorRequest` to the plugin's stdin and reads a
//! serialized `CodeGeneratorResponse` back from its stdout.

use std::error::Error;
use std::io::{Read, Write};

use log::debug;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use pyi_build::{Config, Target};

/// Runs a plugin to completion, exiting the process with status 1 on failure.
pub fn main(target: Target) {
    env_logger::init();

    if let Err(e) = faillible_main(target) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn faillible_main(target: Target) -> Result<(), Box<dyn Error>> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    debug!("read {} request bytes", buf.len());

    let req = CodeGeneratorRequest::decode(buf.as_slice()).map_err(pyi_build::Error::from)?;
    let config = Config::new_from_opts(req.parameter());
    let res = config.compile_request(&req, target)?;

    if !config.is_quiet() {
        for file in &res.file {
            eprintln!("Writing mypy to {}", file.name());
        }
    }

    std::io::stdout().write_all(&res.encode_to_vec())?;

    Ok(())
}
