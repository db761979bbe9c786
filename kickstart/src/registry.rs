//! Versioned command tables
//!
//! Each syntax version is described as a list of [`Change`]s applied on top
//! of the previous version. Folding the lists from FC3 up to the requested
//! version yields the flat name -> [`Binding`] map used by the handler.

use std::collections::BTreeMap;

use log::trace;

use crate::{
    commands::{
        autopart::AutoPart, bootloader::Bootloader, clearpart::ClearPart,
        displaymode::DisplayMode, eula::Eula, firewall::Firewall, firstboot::Firstboot,
        ignoredisk::IgnoreDisk, keyboard::Keyboard, lang::Lang, lang::LangSupport,
        liveimg::LiveImg, logging::Logging, logvol::LogVol, method::Method, mouse::Mouse,
        network::Network, partition::Partition, raid::Raid, reboot::Reboot, repo::Repo,
        reqpart::ReqPart, rootpw::Rootpw, selinux::Selinux, services::Services,
        snapshot::Snapshot, sshkey::SshKey, timezone::Timezone, toggle::Toggle, url::Url,
        user::Group, user::User, volgroup::VolGroup, CommandFactory, KickstartCommand,
    },
    version::Version,
};

/// One modification of the command catalog
#[derive(Debug, Clone, Copy)]
pub enum Change {
    /// The names share one new instance built by the factory
    Register(&'static [&'static str], CommandFactory),
    /// The names keep working but warn on use
    Deprecate(&'static [&'static str]),
    /// The names are rejected
    Remove(&'static [&'static str]),
    /// The names are accepted and do nothing
    Ignore(&'static [&'static str]),
}

use Change::*;

const FC3: &[Change] = &[
    Register(&["autopart"], AutoPart::boxed),
    Register(&["autostep"], Toggle::autostep),
    Register(&["bootloader"], Bootloader::boxed),
    Register(&["clearpart"], ClearPart::boxed),
    Register(&["cmdline", "graphical", "text"], DisplayMode::boxed),
    Register(&["firewall"], Firewall::boxed),
    Register(&["firstboot"], Firstboot::boxed),
    Register(&["ignoredisk"], IgnoreDisk::boxed),
    Register(&["install", "upgrade"], Method::boxed),
    Register(&["interactive"], Toggle::interactive),
    Register(&["keyboard"], Keyboard::boxed),
    Register(&["lang"], Lang::boxed),
    Register(&["langsupport"], LangSupport::boxed),
    Register(&["logvol"], LogVol::boxed),
    Register(&["mediacheck"], Toggle::mediacheck),
    Register(&["mouse"], Mouse::boxed),
    Register(&["network"], Network::boxed),
    Register(&["part", "partition"], Partition::boxed),
    Register(&["raid"], Raid::boxed),
    Register(&["reboot", "poweroff", "shutdown", "halt"], Reboot::boxed),
    Register(&["rootpw"], Rootpw::boxed),
    Register(&["selinux"], Selinux::boxed),
    Register(&["skipx"], Toggle::skipx),
    Register(&["timezone"], Timezone::boxed),
    Register(&["url"], Url::boxed),
    Register(&["volgroup"], VolGroup::boxed),
    Register(&["zerombr"], Toggle::zerombr),
    Ignore(&["lilocheck"]),
];

const FC6: &[Change] = &[
    Register(&["logging"], Logging::boxed),
    Register(&["repo"], Repo::boxed),
    Register(&["services"], Services::boxed),
    Register(&["user"], User::boxed),
];

const F8: &[Change] = &[Deprecate(&["mouse", "langsupport"])];

const F12: &[Change] = &[
    Register(&["group"], Group::boxed),
    Remove(&["mouse", "langsupport", "lilocheck"]),
];

const F18: &[Change] = &[
    Register(&["keyboard"], Keyboard::boxed_layouts),
    Register(&["timezone"], Timezone::boxed_ntp),
    Register(&["liveimg"], LiveImg::boxed),
    Deprecate(&["interactive"]),
];

const F20: &[Change] = &[
    Register(&["autopart"], AutoPart::boxed_exclusive),
    Register(&["eula"], Eula::boxed),
    Deprecate(&["upgrade"]),
];

const F23: &[Change] = &[
    Register(&["reqpart"], ReqPart::boxed),
    Register(&["sshkey"], SshKey::boxed),
];

const F29: &[Change] = &[
    Register(&["snapshot"], Snapshot::boxed),
    Remove(&["interactive", "upgrade"]),
    Deprecate(&["install"]),
];

const F34: &[Change] = &[Remove(&["install"])];

/// Changes introduced by exactly this version
pub fn changes(version: Version) -> &'static [Change] {
    match version {
        Version::FC3 => FC3,
        Version::FC6 => FC6,
        Version::F8 => F8,
        Version::F12 => F12,
        Version::F18 => F18,
        Version::F20 => F20,
        Version::F23 => F23,
        Version::F29 => F29,
        Version::F34 => F34,
    }
}

/// What a directive name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Index into the command list
    Command(usize),
    Deprecated { index: usize, since: Version },
    Ignored,
    Removed(Version),
}

impl Binding {
    /// Index of the instance this name dispatches to, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            Binding::Command(index) | Binding::Deprecated { index, .. } => Some(*index),
            Binding::Ignored | Binding::Removed(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct CommandEntry {
    pub factory: CommandFactory,
    pub command: Box<dyn KickstartCommand>,
}

/// Flat command catalog of one version
#[derive(Debug, Default)]
pub struct CommandTable {
    pub bindings: BTreeMap<String, Binding>,
    pub entries: Vec<CommandEntry>,
}

impl CommandTable {
    /// Fold every change from FC3 up to and including `version`
    pub fn for_version(version: Version) -> Self {
        let mut table = Self::default();
        for v in Version::all().take_while(|v| *v <= version) {
            for change in changes(v) {
                table.apply(*change, v, version);
            }
        }
        table.compact();
        table
    }

    /// Apply one change; `since` is the version that introduced it and
    /// `target` the version instances are built for
    pub fn apply(&mut self, change: Change, since: Version, target: Version) {
        match change {
            Register(names, factory) => self.register(names, factory, target),
            Deprecate(names) => names.iter().for_each(|n| {
                self.deprecate(n, since);
            }),
            Remove(names) => names.iter().for_each(|n| self.remove(n, since)),
            Ignore(names) => names.iter().for_each(|n| self.ignore(n)),
        }
    }

    pub fn register(&mut self, names: &[&str], factory: CommandFactory, version: Version) {
        let index = self.entries.len();
        self.entries.push(CommandEntry {
            factory,
            command: factory(version),
        });
        for name in names {
            trace!("Binding '{name}' to command #{index}");
            self.bindings
                .insert(name.to_string(), Binding::Command(index));
        }
    }

    /// Returns false when the name dispatches to nothing
    pub fn deprecate(&mut self, name: &str, since: Version) -> bool {
        match self.bindings.get_mut(name) {
            Some(binding) => match binding.index() {
                Some(index) => {
                    *binding = Binding::Deprecated { index, since };
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    pub fn remove(&mut self, name: &str, since: Version) {
        self.bindings
            .insert(name.to_string(), Binding::Removed(since));
    }

    pub fn ignore(&mut self, name: &str) {
        self.bindings.insert(name.to_string(), Binding::Ignored);
    }

    /// Drop instances no name dispatches to anymore
    pub fn compact(&mut self) {
        let mut used = vec![false; self.entries.len()];
        for binding in self.bindings.values() {
            if let Some(index) = binding.index() {
                used[index] = true;
            }
        }

        let mut remap = Vec::with_capacity(used.len());
        let mut next = 0;
        for keep in &used {
            if *keep {
                remap.push(Some(next));
                next += 1;
            } else {
                remap.push(None);
            }
        }

        let mut index = 0;
        self.entries.retain(|_| {
            let keep = used[index];
            index += 1;
            keep
        });

        for binding in self.bindings.values_mut() {
            match binding {
                Binding::Command(index) | Binding::Deprecated { index, .. } => {
                    if let Some(new) = remap[*index] {
                        *index = new;
                    }
                }
                Binding::Ignored | Binding::Removed(_) => {}
            }
        }
    }

    /// Whether the name is still accepted but deprecated
    pub fn is_deprecated(&self, name: &str) -> bool {
        matches!(self.bindings.get(name), Some(Binding::Deprecated { .. }))
    }

    /// Whether a non-deprecated name dispatches to this instance
    pub fn is_serialized(&self, index: usize) -> bool {
        self.bindings
            .values()
            .any(|b| *b == Binding::Command(index))
    }
}
