use std::collections::{BTreeMap, BTreeSet};

use clap::Parser;
use log::debug;
use strum_macros::Display;

use crate::{
    commands::{flag, opt_some},
    errors::{KickstartError, ToResultKickstartError},
    handler::KickstartHandler,
    parser::strip_comment,
    types::KsLine,
    version::Version,
};

use super::SectionHandler;

#[derive(Parser, Debug, Clone, Default)]
struct PackagesArgs {
    /// Install the default package set
    #[arg(long)]
    default: bool,

    #[arg(long)]
    excludedocs: bool,

    #[arg(long)]
    nobase: bool,

    #[arg(long)]
    nocore: bool,

    #[arg(long)]
    ignoremissing: bool,

    /// Languages to install translations for
    #[arg(long = "instLangs")]
    inst_langs: Option<String>,

    #[arg(long)]
    multilib: bool,

    #[arg(long = "excludeWeakdeps")]
    exclude_weakdeps: bool,

    #[arg(long)]
    retries: Option<u32>,

    #[arg(long)]
    timeout: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(name = "group")]
struct GroupArgs {
    name: String,

    /// Only install the mandatory packages of the group
    #[arg(long, conflicts_with = "optional")]
    nodefaults: bool,

    /// Also install the optional packages of the group
    #[arg(long)]
    optional: bool,
}

/// How much of a group is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Display)]
pub enum GroupLevel {
    Required,
    #[default]
    Default,
    All,
}

/// Everything collected from the `%packages` sections
#[derive(Debug, Clone, Default)]
pub struct Packages {
    pub seen: bool,
    pub version: Version,

    pub default: bool,
    pub excludedocs: bool,
    pub nobase: bool,
    pub nocore: bool,
    pub ignoremissing: bool,
    pub inst_langs: Option<String>,
    pub multilib: bool,
    pub exclude_weakdeps: bool,
    pub retries: Option<u32>,
    pub timeout: Option<u32>,

    /// `*` was given
    pub everything: bool,
    pub environment: Option<String>,
    pub packages: BTreeSet<String>,
    pub excluded_packages: BTreeSet<String>,
    pub groups: BTreeMap<String, GroupLevel>,
    pub excluded_groups: BTreeSet<String>,
}

impl Packages {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.everything
            && self.environment.is_none()
            && self.packages.is_empty()
            && self.excluded_packages.is_empty()
            && self.groups.is_empty()
            && self.excluded_groups.is_empty()
    }

    /// Merge one batch of body lines
    ///
    /// Within a batch exclusions win over inclusions. A later batch may
    /// include again what an earlier one excluded, so the included and
    /// excluded sets never overlap.
    pub fn add(&mut self, lines: &[KsLine]) -> Result<(), KickstartError> {
        let mut new_packages = BTreeSet::new();
        let mut new_excluded = BTreeSet::new();
        let mut new_groups = Vec::new();
        let mut new_excluded_groups = BTreeSet::new();

        for line in lines {
            let stripped = strip_comment(&line.raw).trim();
            if stripped.is_empty() {
                continue;
            }

            if stripped == "*" {
                self.everything = true;
            } else if let Some(env) = stripped.strip_prefix("@^") {
                self.environment = Some(env.trim().to_string());
            } else if let Some(env) = stripped.strip_prefix("-@^") {
                if self.environment.as_deref() == Some(env.trim()) {
                    self.environment = None;
                }
            } else if let Some(group) = stripped.strip_prefix('@') {
                new_groups.push(parse_group(line, group)?);
            } else if let Some(group) = stripped.strip_prefix("-@") {
                new_excluded_groups.insert(group.trim().to_string());
            } else if let Some(package) = stripped.strip_prefix('-') {
                new_excluded.insert(package.trim().to_string());
            } else {
                new_packages.insert(stripped.to_string());
            }
        }

        self.packages.extend(new_packages);
        self.packages.retain(|p| !new_excluded.contains(p));
        self.excluded_packages.extend(new_excluded);
        self.excluded_packages
            .retain(|p| !self.packages.contains(p));

        // The first listing of a group decides its level
        for (name, level) in new_groups {
            self.groups.entry(name).or_insert(level);
        }
        self.groups
            .retain(|name, _| !new_excluded_groups.contains(name));
        self.excluded_groups.extend(new_excluded_groups);
        self.excluded_groups
            .retain(|name| !self.groups.contains_key(name));

        Ok(())
    }

    fn apply_header(&mut self, args: PackagesArgs) {
        self.default = args.default;
        self.excludedocs = args.excludedocs;
        self.nobase = args.nobase;
        self.nocore = args.nocore;
        self.ignoremissing = args.ignoremissing;
        self.inst_langs = args.inst_langs;
        self.multilib = args.multilib;
        self.exclude_weakdeps = args.exclude_weakdeps;
        self.retries = args.retries;
        self.timeout = args.timeout;
    }
}

fn parse_group(line: &KsLine, spec: &str) -> Result<(String, GroupLevel), KickstartError> {
    let tokens = shellwords::split(spec).to_result_parser_error(line)?;
    let args = GroupArgs::try_parse_from(std::iter::once("group".to_string()).chain(tokens))
        .to_result_parser_error(line)?;

    let level = if args.nodefaults {
        GroupLevel::Required
    } else if args.optional {
        GroupLevel::All
    } else {
        GroupLevel::Default
    };
    Ok((args.name, level))
}

impl std::fmt::Display for Packages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = [
            flag("default", self.default),
            flag("excludedocs", self.excludedocs),
            flag("nobase", self.nobase),
            flag("nocore", self.nocore),
            flag("ignoremissing", self.ignoremissing),
            opt_some("instLangs", &self.inst_langs),
            flag("multilib", self.multilib),
            flag("excludeWeakdeps", self.exclude_weakdeps),
            opt_some("retries", &self.retries),
            opt_some("timeout", &self.timeout),
        ]
        .concat();
        writeln!(f, "\n%packages{header}")?;

        if let Some(env) = &self.environment {
            writeln!(f, "@^{env}")?;
        }
        if self.everything {
            writeln!(f, "*")?;
        }
        for (name, level) in &self.groups {
            match level {
                GroupLevel::Required => writeln!(f, "@{name} --nodefaults")?,
                GroupLevel::Default => writeln!(f, "@{name}")?,
                GroupLevel::All => writeln!(f, "@{name} --optional")?,
            }
        }
        for package in &self.packages {
            writeln!(f, "{package}")?;
        }
        for group in &self.excluded_groups {
            writeln!(f, "-@{group}")?;
        }
        for package in &self.excluded_packages {
            writeln!(f, "-{package}")?;
        }

        if self.version.requires_section_end() {
            writeln!(f, "%end")?;
        }
        Ok(())
    }
}

/// Handler for `%packages`
#[derive(Debug, Default)]
pub struct PackageSection {
    header: Option<PackagesArgs>,
    body: Vec<KsLine>,
}

impl SectionHandler for PackageSection {
    fn opener(&self) -> &str {
        "%packages"
    }

    fn handle_header(
        &mut self,
        _: Version,
        line: &KsLine,
        tokens: Vec<String>,
    ) -> Result<(), KickstartError> {
        self.header = Some(PackagesArgs::try_parse_from(tokens).to_result_parser_error(line)?);
        Ok(())
    }

    fn handle_line(&mut self, line: &KsLine) {
        self.body.push(line.clone());
    }

    fn finalize(&mut self, handler: &mut KickstartHandler) -> Result<(), KickstartError> {
        let Some(header) = self.header.take() else {
            return Ok(());
        };

        debug!("Adding {} package lines", self.body.len());
        let packages = &mut handler.packages;
        packages.seen = true;
        packages.apply_header(header);
        packages.add(&self.body)
    }

    fn new_instance(&self) -> Box<dyn SectionHandler> {
        Self::default().boxed()
    }
}
