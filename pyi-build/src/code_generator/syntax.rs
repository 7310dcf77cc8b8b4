#[derive(Debug, PartialEq)]
pub(super) enum Syntax {
    Proto2,
    Proto3,
    Editions,
}

impl From<Option<&str>> for Syntax {
    fn from(optional_str: Option<&str>) -> Self {
        match optional_str {
            Some("proto3") => Syntax::Proto3,
            Some("editions") => Syntax::Editions,
            // protoc omits the field for proto2 files.
            _ => Syntax::Proto2,
        }
    }
}

impl Syntax {
    /// Returns `true` when every singular scalar field is implicitly present, so that presence
    /// can only be asked of message fields and oneof members.
    pub(super) fn has_implicit_presence(&self) -> bool {
        *self == Syntax::Proto3
    }
}
