// src/packer.rs

//! Front for running local Packer commands.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::exec::{Execution, Executor, Terminal};

/// Program name resolved through `PATH` by default.
pub const PACKER_PROGRAM: &str = "packer";

/// Arguments for the `build` command.
///
/// `vars` is a sorted map so the assembled argument vector is deterministic.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Template file path, relative to the working directory.
    pub template: String,
    /// Pass `-force` to overwrite existing artifacts.
    pub force: bool,
    /// Builds to run exclusively (`-only a,b`), if non-empty.
    pub only: Vec<String>,
    /// Builds to skip (`-except a,b`), if non-empty.
    pub except: Vec<String>,
    /// Template variables, each passed as `-var key=value`.
    pub vars: BTreeMap<String, String>,
    /// Variable files, each passed as `-var-file path`.
    pub var_files: Vec<String>,
}

/// Tool front that assembles command argument vectors and delegates to an
/// [`Executor`].
pub struct Packer {
    executor: Executor,
}

impl Packer {
    /// Packer instance using the default program name.
    pub fn new(terminal: Arc<dyn Terminal>) -> Self {
        Self::with_program(PACKER_PROGRAM, terminal)
    }

    /// Packer instance running `program` instead of the default binary.
    pub fn with_program(program: impl Into<String>, terminal: Arc<dyn Terminal>) -> Self {
        Self {
            executor: Executor::new(program, terminal),
        }
    }

    /// Start a `build` command execution.
    pub fn build(&self, options: &BuildOptions) -> Result<Execution> {
        let template = options.template.trim();
        if template.is_empty() {
            return Err(anyhow::anyhow!("build template is empty").into());
        }
        let mut args = Vec::new();
        if options.force {
            args.push("-force".to_string());
        }
        if !options.only.is_empty() {
            args.push("-only".to_string());
            args.push(options.only.join(","));
        }
        if !options.except.is_empty() {
            args.push("-except".to_string());
            args.push(options.except.join(","));
        }
        for (key, value) in &options.vars {
            args.push("-var".to_string());
            args.push(format!("{key}={value}"));
        }
        for var_file in &options.var_files {
            args.push("-var-file".to_string());
            args.push(var_file.clone());
        }
        args.push(template.to_string());
        self.executor.execute("build", &args)
    }
}
