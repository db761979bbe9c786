use log::debug;
use std::path::PathBuf;

use clap::Parser;

use crate::{
    commands::{flag, opt, opt_some},
    errors::{KickstartError, ToResultKickstartError},
    handler::KickstartHandler,
    types::KsLine,
    version::Version,
};

use super::SectionHandler;

const DEFAULT_INTERPRETER: &str = "/bin/sh";

#[derive(Parser, Debug, Clone)]
struct ScriptArgs {
    #[arg(long)]
    erroronfail: bool,

    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    interpreter: PathBuf,

    #[arg(long, alias = "logfile")]
    log: Option<PathBuf>,

    #[arg(long)]
    nochroot: bool,
}

/// A script section. Scripts are stored, never run.
#[derive(Debug, Clone)]
pub struct Script {
    pub line: KsLine,
    pub script_type: ScriptType,
    pub version: Version,
    pub body: String,
    pub erroronfail: bool,
    pub interpreter: PathBuf,
    pub log: Option<PathBuf>,
    pub nochroot: bool,
}

impl Script {
    pub fn name(&self) -> String {
        format!("ks-script/{}", self.line.get_id())
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let interpreter = if self.interpreter.as_os_str() != DEFAULT_INTERPRETER {
            opt("interpreter", self.interpreter.display())
        } else {
            String::new()
        };
        writeln!(
            f,
            "\n{}{}{}{}{}",
            self.script_type,
            interpreter,
            flag("erroronfail", self.erroronfail),
            opt_some("log", &self.log.as_ref().map(|l| l.display())),
            flag("nochroot", self.nochroot)
        )?;
        write!(f, "{}", self.body)?;
        if self.version.requires_section_end() {
            writeln!(f, "%end")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    Pre,
    PreInstall,
    Post,
    Traceback,
    OnError,
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptType::Pre => write!(f, "%pre"),
            ScriptType::PreInstall => write!(f, "%pre-install"),
            ScriptType::Post => write!(f, "%post"),
            ScriptType::Traceback => write!(f, "%traceback"),
            ScriptType::OnError => write!(f, "%onerror"),
        }
    }
}

impl ScriptType {
    fn opener(self) -> &'static str {
        match self {
            ScriptType::Pre => "%pre",
            ScriptType::PreInstall => "%pre-install",
            ScriptType::Post => "%post",
            ScriptType::Traceback => "%traceback",
            ScriptType::OnError => "%onerror",
        }
    }
}

/// Handler for `%pre`, `%pre-install`, `%post`, `%traceback` and `%onerror`
#[derive(Debug)]
pub struct ScriptSection {
    script_type: ScriptType,
    script: Option<Script>,
    body: Vec<String>,
}

impl ScriptSection {
    pub fn new(script_type: ScriptType) -> Self {
        Self {
            script_type,
            script: None,
            body: Vec::new(),
        }
    }
}

impl SectionHandler for ScriptSection {
    fn opener(&self) -> &str {
        self.script_type.opener()
    }

    fn all_lines(&self) -> bool {
        true
    }

    fn handle_header(
        &mut self,
        version: Version,
        line: &KsLine,
        tokens: Vec<String>,
    ) -> Result<(), KickstartError> {
        let args = ScriptArgs::try_parse_from(tokens).to_result_parser_error(line)?;

        // nochroot option is only valid for %post scripts
        if self.script_type != ScriptType::Post && args.nochroot {
            return Err(KickstartError::new_value(
                line.clone(),
                "--nochroot is only valid for %post scripts",
            ));
        }

        self.script = Some(Script {
            line: line.clone(),
            script_type: self.script_type,
            version,
            body: String::new(),
            erroronfail: args.erroronfail,
            interpreter: args.interpreter,
            log: args.log,
            nochroot: args.nochroot,
        });
        Ok(())
    }

    fn handle_line(&mut self, line: &KsLine) {
        self.body.push(line.raw.clone());
    }

    fn finalize(&mut self, handler: &mut KickstartHandler) -> Result<(), KickstartError> {
        let Some(mut script) = self.script.take() else {
            return Ok(());
        };

        while self.body.last().is_some_and(|l| l.trim().is_empty()) {
            self.body.pop();
        }

        if !self.body.is_empty() {
            script.body = self.body.join("\n");
            script.body.push('\n');
        }

        debug!(
            "Adding {} script {} ({} lines)",
            script.script_type,
            script.name(),
            self.body.len()
        );
        handler.scripts.push(script);
        Ok(())
    }

    fn new_instance(&self) -> Box<dyn SectionHandler> {
        Self::new(self.script_type).boxed()
    }
}
