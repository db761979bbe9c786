use log::{debug, trace};

use crate::{
    commands::{CommandFactory, KickstartCommand, ParseContext},
    errors::KickstartError,
    registry::{Binding, CommandTable},
    sections::{null::NullSectionData, packages::Packages, script::Script},
    types::KsLine,
    version::Version,
};

/// All state accumulated while parsing a kickstart for one syntax version
///
/// The handler owns one instance per directive family, bound to every name
/// that dispatches to it, plus the results of the sections.
#[derive(Debug)]
pub struct KickstartHandler {
    version: Version,
    table: CommandTable,

    /// Scripts in input order
    pub scripts: Vec<Script>,

    /// Merged `%packages` content
    pub packages: Packages,

    /// Value of the `#platform=` comment
    pub platform: Option<String>,

    /// Sections kept verbatim
    pub null_sections: Vec<NullSectionData>,
}

impl KickstartHandler {
    pub fn new(version: Version) -> Self {
        let table = CommandTable::for_version(version);
        debug!(
            "Created {} handler with {} names bound to {} commands",
            version,
            table.bindings.len(),
            table.entries.len()
        );
        Self {
            version,
            table,
            scripts: Vec::new(),
            packages: Packages::new(version),
            platform: None,
            null_sections: Vec::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Route one directive to its command
    ///
    /// `tokens[0]` is the directive name. Returns the warnings produced while
    /// parsing; any error leaves the command marked as not seen if it was not
    /// seen before.
    pub fn dispatch(
        &mut self,
        tokens: Vec<String>,
        line: &KsLine,
    ) -> Result<Vec<KickstartError>, KickstartError> {
        let Some(name) = tokens.first().cloned() else {
            return Ok(Vec::new());
        };

        let mut warnings = Vec::new();
        let index = match self.table.bindings.get(&name).copied() {
            None => return Err(KickstartError::new_unknown_command(line.clone(), name)),
            Some(Binding::Ignored) => {
                debug!("Ignoring command '{name}' at {}:{}", line.source, line.lineno);
                return Ok(warnings);
            }
            Some(Binding::Removed(since)) => {
                return Err(KickstartError::new_removed(line.clone(), name, since));
            }
            Some(Binding::Deprecated { index, since }) => {
                warnings.push(KickstartError::new_deprecated(line.clone(), &name, since));
                index
            }
            Some(Binding::Command(index)) => index,
        };

        self.check_conflicts(index, &name, line)?;

        let Some(entry) = self.table.entries.get_mut(index) else {
            return Err(KickstartError::new_unknown_command(line.clone(), name));
        };

        trace!("Dispatching '{name}' to {}", entry.command.name());
        let base = entry.command.base_mut();
        base.current_cmd = name;
        base.line = line.clone();

        let mut ctx = ParseContext::new(self.version, line.clone());
        entry.command.parse(&mut ctx, tokens)?;
        entry.command.base_mut().seen = true;

        warnings.extend(ctx.into_warnings());
        Ok(warnings)
    }

    /// Families may declare each other incompatible from either side
    fn check_conflicts(&self, index: usize, name: &str, line: &KsLine) -> Result<(), KickstartError> {
        let Some(current) = self.table.entries.get(index) else {
            return Ok(());
        };
        let current = current.command.as_ref();

        for (other_index, other) in self.table.entries.iter().enumerate() {
            let other = other.command.as_ref();
            if other_index == index || !other.seen() {
                continue;
            }

            if current.conflicts().contains(&other.name())
                || other.conflicts().contains(&current.name())
            {
                return Err(KickstartError::new_syntax(
                    line.clone(),
                    format!(
                        "The {} and {} commands cannot be used together",
                        name,
                        other.base().current_cmd
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Bind the names to a new instance built by `factory`
    pub fn register_command(&mut self, names: &[&str], factory: CommandFactory) {
        self.table.register(names, factory, self.version);
        self.table.compact();
    }

    /// Accept the name and do nothing with it
    pub fn ignore_command(&mut self, name: &str) {
        self.table.ignore(name);
        self.table.compact();
    }

    /// Keep the name working but warn on every use
    ///
    /// Returns false if the name does not dispatch to a command.
    pub fn deprecate_command(&mut self, name: &str) -> bool {
        self.table.deprecate(name, self.version)
    }

    /// Reject the name from now on
    pub fn remove_command(&mut self, name: &str) {
        self.table.remove(name, self.version);
        self.table.compact();
    }

    /// Restore the command bound to `name` to its factory defaults
    pub fn reset_command(&mut self, name: &str) -> bool {
        let Some(index) = self.table.bindings.get(name).and_then(|b| b.index()) else {
            return false;
        };
        match self.table.entries.get_mut(index) {
            Some(entry) => {
                entry.command = (entry.factory)(self.version);
                true
            }
            None => false,
        }
    }

    /// Forget everything parsed so far
    pub fn reset(&mut self) {
        for entry in self.table.entries.iter_mut() {
            entry.command = (entry.factory)(self.version);
        }
        self.scripts.clear();
        self.packages = Packages::new(self.version);
        self.platform = None;
        self.null_sections.clear();
    }

    /// Typed access to the instance of a command family
    pub fn command<T: KickstartCommand>(&self) -> Option<&T> {
        self.table
            .entries
            .iter()
            .find_map(|e| e.command.as_any().downcast_ref::<T>())
    }

    pub fn command_mut<T: KickstartCommand>(&mut self) -> Option<&mut T> {
        self.table
            .entries
            .iter_mut()
            .find_map(|e| e.command.as_any_mut().downcast_mut::<T>())
    }

    /// The command a directive name dispatches to
    pub fn get(&self, name: &str) -> Option<&dyn KickstartCommand> {
        let index = self.table.bindings.get(name)?.index()?;
        let entry = self.table.entries.get(index)?;
        Some(entry.command.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn KickstartCommand> {
        let index = self.table.bindings.get(name)?.index()?;
        let entry = self.table.entries.get_mut(index)?;
        Some(entry.command.as_mut())
    }

    /// Whether the name dispatches to a command
    pub fn has_command(&self, name: &str) -> bool {
        self.table
            .bindings
            .get(name)
            .and_then(|b| b.index())
            .is_some()
    }

    /// Every known directive name and what it resolves to
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.table.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[cfg(test)]
    pub(crate) fn dispatch_line(&mut self, raw: &str) -> Result<Vec<KickstartError>, KickstartError> {
        use crate::{errors::ToResultKickstartError, types::KsLineSource};

        let line = KsLine::new(KsLineSource::InputString, 1, raw);
        let tokens = shellwords::split(raw).to_result_parser_error(&line)?;
        self.dispatch(tokens, &line)
    }
}

impl std::fmt::Display for KickstartHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(platform) = &self.platform {
            writeln!(f, "#platform={platform}")?;
        }
        writeln!(f, "#version={}", self.version)?;

        let entries = &self.table.entries;
        let mut order: Vec<usize> = (0..entries.len())
            .filter(|i| self.table.is_serialized(*i))
            // Last used through a deprecated alias
            .filter(|i| !self.table.is_deprecated(&entries[*i].command.base().current_cmd))
            .collect();
        order.sort_by_key(|i| entries[*i].command.write_priority());
        for index in order {
            write!(f, "{}", entries[index].command)?;
        }

        for script in &self.scripts {
            write!(f, "{script}")?;
        }

        for section in &self.null_sections {
            write!(f, "{section}")?;
        }

        if self.packages.seen || !self.packages.is_empty() {
            write!(f, "{}", self.packages)?;
        }

        Ok(())
    }
}
