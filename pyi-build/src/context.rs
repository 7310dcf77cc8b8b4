use std::collections::HashMap;

use prost_types::FileDescriptorProto;

use crate::descriptor_index::DescriptorIndex;
use crate::{Error, Result};

/// The context providing all the global information needed to generate stubs.
///
/// A `Context` is built once per request and is reused, read-only, by the `CodeGenerator`
/// instances created to generate each requested file.
pub struct Context<'a> {
    files: HashMap<&'a str, &'a FileDescriptorProto>,
    index: DescriptorIndex<'a>,
}

impl<'a> Context<'a> {
    pub fn new(files: &'a [FileDescriptorProto]) -> Result<Self> {
        Ok(Self {
            files: files.iter().map(|file| (file.name(), file)).collect(),
            index: DescriptorIndex::new(files)?,
        })
    }

    pub fn index(&self) -> &DescriptorIndex<'a> {
        &self.index
    }

    /// Returns the named file of the request.
    pub fn file(&self, name: &str) -> Result<&'a FileDescriptorProto> {
        self.files
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingFile(name.to_owned()))
    }
}
