use std::collections::{BTreeMap, BTreeSet};

use crate::ident::{is_py2_only_builtin, mangle_builtin};

/// The imports and builtin aliases referenced while generating a single stub file.
///
/// Every referenced name is imported under an alias derived from its module path, so names from
/// different modules (and fields shadowing them) can never collide. Rendering is sorted, making
/// the import block independent of the order in which references were requested.
#[derive(Debug, Default)]
pub struct ImportRegistry {
    imports: BTreeMap<String, BTreeSet<(String, String)>>,
    builtins: BTreeSet<String>,
    py2_builtins: BTreeSet<String>,
}

impl ImportRegistry {
    pub fn new() -> ImportRegistry {
        ImportRegistry::default()
    }

    /// Imports `symbol` from `module` and returns the local alias for it.
    ///
    /// `module` may be given as a path (`a/b`) or dotted (`a.b`). Repeated requests for the same
    /// symbol return the same alias and are recorded once.
    pub fn request(&mut self, module: &str, symbol: &str) -> String {
        let module = module.replace('/', ".");
        let alias = format!("{}___{}", module.replace('.', "___"), symbol);
        self.imports
            .entry(module)
            .or_default()
            .insert((symbol.to_owned(), alias.clone()));
        alias
    }

    /// Records a reference to a Python builtin and returns its mangled alias.
    ///
    /// Builtins are aliased on first use, so a file only gets aliases for the builtins it
    /// references rather than the full `bool`, `bytes`, `float`, `int` set.
    pub fn builtin(&mut self, name: &str) -> String {
        if is_py2_only_builtin(name) {
            self.py2_builtins.insert(name.to_owned());
        } else {
            self.builtins.insert(name.to_owned());
        }
        mangle_builtin(name)
    }

    /// Renders the import block followed by the builtin alias block.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec!["import sys".to_owned()];
        for (module, symbols) in &self.imports {
            lines.push(format!("from {} import (", module));
            for (symbol, alias) in symbols {
                lines.push(format!("    {} as {},", symbol, alias));
            }
            lines.push(")\n".to_owned());
        }
        lines.push(String::new());

        let mut aliases: Vec<String> = self
            .builtins
            .iter()
            .map(|name| format!("{} = {}", mangle_builtin(name), name))
            .collect();
        if !self.py2_builtins.is_empty() {
            aliases.push("if sys.version_info < (3,):".to_owned());
            aliases.extend(
                self.py2_builtins
                    .iter()
                    .map(|name| format!("    {} = {}", mangle_builtin(name), name)),
            );
        }
        if !aliases.is_empty() {
            aliases.push("\n".to_owned());
        }

        lines.extend(aliases);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_idempotent() {
        let mut imports = ImportRegistry::new();
        let first = imports.request("typing", "Optional");
        for _ in 0..5 {
            assert_eq!(first, imports.request("typing", "Optional"));
        }
        assert_eq!("typing___Optional", first);
        assert_eq!(
            vec![
                "import sys",
                "from typing import (",
                "    Optional as typing___Optional,",
                ")\n",
                "",
            ],
            imports.render()
        );
    }

    #[test]
    fn test_alias_from_path() {
        let mut imports = ImportRegistry::new();
        assert_eq!(
            "google___protobuf___descriptor___Descriptor",
            imports.request("google/protobuf/descriptor", "Descriptor")
        );
        assert_eq!(
            "google___protobuf___descriptor___Descriptor",
            imports.request("google.protobuf.descriptor", "Descriptor")
        );
        assert_eq!(1, imports.imports.len());
    }

    #[test]
    fn test_only_referenced_builtins_are_aliased() {
        let mut imports = ImportRegistry::new();
        assert_eq!("builtin___bool", imports.builtin("bool"));
        assert_eq!("builtin___bool", imports.builtin("bool"));
        assert_eq!(
            vec!["import sys", "", "builtin___bool = bool", "\n"],
            imports.render()
        );
    }

    #[test]
    fn test_render_is_sorted() {
        let mut imports = ImportRegistry::new();
        imports.request("typing", "Text");
        imports.request("google.protobuf.message", "Message");
        imports.request("typing", "Optional");
        imports.builtin("int");
        imports.builtin("bool");
        imports.builtin("unicode");

        assert_eq!(
            vec![
                "import sys",
                "from google.protobuf.message import (",
                "    Message as google___protobuf___message___Message,",
                ")\n",
                "from typing import (",
                "    Optional as typing___Optional,",
                "    Text as typing___Text,",
                ")\n",
                "",
                "builtin___bool = bool",
                "builtin___int = int",
                "if sys.version_info < (3,):",
                "    builtin___unicode = unicode",
                "\n",
            ],
            imports.render()
        );
    }
}
