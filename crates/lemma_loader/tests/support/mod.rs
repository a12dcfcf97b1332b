//! A line-oriented toy checker and a temporary project for loader tests.
//!
//! Each non-empty line of a module is one directive:
//!
//! ```text
//! module A.B                  declared module name (defaults to the expected one)
//! {-# OPTIONS --safe #-}      enable pragma flags
//! import C                    resolve an import
//! def zero : Nat              export a definition
//! private helper              a private name, kept only when the mode retains private declarations
//! builtin NATURAL Nat         bind a builtin
//! warning some message        report a warning while checking
//! import-warning message      report a message to every importer
//! error message               fail the check
//! touch-self                  append to the module's own source while checking
//! -- comment
//! ```

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lemma_cache::ModuleExports;
use lemma_common::ModuleName;
use lemma_config::{OptionFlag, SessionConfig};
use lemma_diagnostics::{Diagnostic, DiagnosticCode};
use lemma_loader::{
    CheckContext, CheckMode, CheckedModule, FsModuleFinder, LoadError, Toolchain, TypeChecker,
};
use lemma_source::SourceFile;
use tempfile::TempDir;

/// Code of warnings raised by `warning` directives.
pub const USER_WARNING: DiagnosticCode = DiagnosticCode::new(100);

/// Shared record of every module the checker was asked to check, in order.
#[derive(Clone, Default)]
pub struct CheckLog(Rc<RefCell<Vec<String>>>);

impl CheckLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, module: &str) -> usize {
        self.0.borrow().iter().filter(|m| *m == module).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub struct ToyChecker {
    log: CheckLog,
}

impl TypeChecker for ToyChecker {
    fn check(
        &self,
        ctx: &mut CheckContext<'_, '_>,
        source: &SourceFile,
        mode: CheckMode,
    ) -> Result<CheckedModule, LoadError> {
        let module = ctx.module().clone();
        self.log.0.borrow_mut().push(module.to_string());

        let mut name = module.clone();
        let mut exports = ModuleExports::default();
        let mut import_warning = None;
        for line in source.text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with("--") {
                continue;
            }
            let (directive, rest) = line.split_once(' ').unwrap_or((line, ""));
            let rest = rest.trim();
            match directive {
                "module" => name = ModuleName::new(rest),
                "{-#" => {
                    for word in rest.split_whitespace() {
                        if let Some(flag) = OptionFlag::from_name(word) {
                            ctx.options_mut().set(flag, true);
                        }
                    }
                }
                "import" => {
                    ctx.resolve_import(&ModuleName::new(rest))?;
                }
                "def" => {
                    let (def, ty) = rest.split_once(':').unwrap_or((rest, "Set"));
                    let def = def.trim().to_string();
                    exports
                        .signature
                        .insert(format!("{module}.{def}"), ty.trim().to_string());
                    exports.scope.insert(def);
                }
                "private" => {
                    if mode.retains_private() {
                        exports.scope.insert(rest.to_string());
                    }
                }
                "builtin" => {
                    let (builtin, bound) = rest.split_once(' ').unwrap_or((rest, rest));
                    exports
                        .builtins
                        .insert(builtin.to_string(), bound.trim().to_string());
                }
                "warning" => ctx.warn(
                    Diagnostic::warning(USER_WARNING, rest).with_module(module.clone()),
                ),
                "import-warning" => import_warning = Some(rest.to_string()),
                "error" => {
                    return Err(LoadError::TypeCheck {
                        module,
                        message: rest.to_string(),
                    })
                }
                "touch-self" => {
                    let mut file = OpenOptions::new()
                        .append(true)
                        .open(&source.path)
                        .map_err(|source_err| LoadError::Source {
                            path: source.path.clone(),
                            source: source_err,
                        })?;
                    writeln!(file, "-- touched").map_err(|source_err| LoadError::Source {
                        path: source.path.clone(),
                        source: source_err,
                    })?;
                }
                other => {
                    return Err(LoadError::TypeCheck {
                        module,
                        message: format!("unknown directive `{other}`"),
                    })
                }
            }
        }

        Ok(CheckedModule {
            name,
            exports,
            import_warning,
        })
    }
}

/// A temporary project with one include root at the project directory.
pub struct Project {
    pub dir: TempDir,
    pub config: SessionConfig,
    pub log: CheckLog,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            config: SessionConfig::default(),
            log: CheckLog::default(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes the source of `module` from `lines`.
    pub fn write(&self, module: &str, lines: &[&str]) {
        self.write_under(self.root(), module, lines);
    }

    pub fn write_under(&self, root: &Path, module: &str, lines: &[&str]) {
        let path = root.join(ModuleName::new(module).to_relative_path("lm"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut text = lines.join("\n");
        text.push('\n');
        fs::write(path, text).unwrap();
    }

    pub fn interface_path(&self, module: &str) -> PathBuf {
        self.root()
            .join(&self.config.build.interface_dir)
            .join(ModuleName::new(module).to_relative_path("lmi"))
    }

    pub fn toolchain(&self) -> Toolchain {
        self.toolchain_with_roots(vec![self.root().to_path_buf()])
    }

    pub fn toolchain_with_roots(&self, roots: Vec<PathBuf>) -> Toolchain {
        Toolchain::new(
            FsModuleFinder::new(roots),
            ToyChecker {
                log: self.log.clone(),
            },
        )
    }
}

pub fn name(module: &str) -> ModuleName {
    ModuleName::new(module)
}
