use std::net::{IpAddr, Ipv4Addr};

use clap::{Parser, ValueEnum};
use strum_macros::Display;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{
    flag, opt_list, opt_some, parse_bool, CommandBase, KickstartCommand, ParseContext,
};

/// One `network` line
///
/// Mimics <https://pykickstart.readthedocs.io/en/latest/kickstart-docs.html#network>
#[derive(Parser, Debug, Clone)]
#[command(name = "network")]
pub struct NetworkData {
    #[clap(skip)]
    pub line: KsLine,

    /// How the device obtains its IPv4 configuration
    #[arg(long)]
    #[arg(requires_if("static", "ip"))]
    pub bootproto: Option<BootProto>,

    /// Device to configure
    ///
    /// Possible values:
    ///
    /// - `<NAME>`: The name of the device to configure
    /// - `<MAC>`: The MAC address of the device to configure
    /// - `link`: The first device with an active link
    #[arg(long)]
    #[arg(verbatim_doc_comment)]
    pub device: Option<DeviceReference>,

    /// Static IPv4 address
    #[arg(long)]
    pub ip: Option<Ipv4Addr>,

    /// Netmask for the static address, e.g. `255.255.255.0`
    #[arg(long, requires = "ip")]
    pub netmask: Option<Ipv4Netmask>,

    /// Default IPv4 gateway
    #[arg(long)]
    pub gateway: Option<Ipv4Addr>,

    /// Comma-separated list of nameservers
    #[arg(long, value_delimiter = ',')]
    pub nameserver: Vec<IpAddr>,

    /// Disable DNS on this device
    #[arg(long, conflicts_with = "nameserver")]
    pub nodns: bool,

    /// Hostname of the installed system
    #[arg(long)]
    pub hostname: Option<String>,

    /// Whether the device is activated at boot
    #[arg(long, value_parser = parse_bool)]
    pub onboot: Option<bool>,

    /// Activate the device in the installation environment
    #[arg(long)]
    pub activate: bool,

    #[arg(long)]
    pub noipv4: bool,

    #[arg(long)]
    pub noipv6: bool,

    /// IPv6 configuration: `auto`, `dhcp` or `<address>[/<prefix>]`
    #[arg(long, conflicts_with = "noipv6")]
    pub ipv6: Option<String>,

    #[arg(long)]
    pub mtu: Option<u16>,

    /// Create a VLAN on top of the device
    #[arg(long, requires = "device")]
    pub vlanid: Option<u16>,

    /// Name of the VLAN interface
    ///
    /// If the name contains a dot (.), it must take the form of `NAME.ID`. The NAME is
    /// arbitrary, but the ID must be the VLAN ID. For example: `em1.171` or `my-vlan.171`.
    /// Names starting with vlan must take the form of `vlanID` - for example: `vlan171`.
    #[arg(long, requires = "vlanid")]
    pub interfacename: Option<String>,

    /// Members of a bond created on the device
    #[arg(long, value_delimiter = ',', requires = "device")]
    pub bondslaves: Vec<String>,

    /// Bond options, e.g. `mode=active-backup,miimon=100`
    #[arg(long, requires = "bondslaves")]
    pub bondopts: Option<String>,

    /// Members of a bridge created on the device
    #[arg(long, value_delimiter = ',', requires = "device", conflicts_with = "bondslaves")]
    pub bridgeslaves: Vec<String>,
}

/// Two network lines describe the same entity only when both name the same
/// device
impl PartialEq for NetworkData {
    fn eq(&self, other: &Self) -> bool {
        match (&self.device, &other.device) {
            (Some(a), Some(b)) => a == b && self.vlanid == other.vlanid,
            _ => false,
        }
    }
}

impl std::fmt::Display for NetworkData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = [
            opt_some("bootproto", &self.bootproto),
            opt_some("device", &self.device),
            opt_some("ip", &self.ip),
            opt_some("netmask", &self.netmask),
            opt_some("gateway", &self.gateway),
            opt_list(
                "nameserver",
                &self.nameserver.iter().map(|ns| ns.to_string()).collect::<Vec<_>>(),
            ),
            flag("nodns", self.nodns),
            opt_some("hostname", &self.hostname),
            opt_some(
                "onboot",
                &self.onboot.map(|on| if on { "on" } else { "off" }),
            ),
            flag("activate", self.activate),
            flag("noipv4", self.noipv4),
            flag("noipv6", self.noipv6),
            opt_some("ipv6", &self.ipv6),
            opt_some("mtu", &self.mtu),
            opt_some("vlanid", &self.vlanid),
            opt_some("interfacename", &self.interfacename),
            opt_list("bondslaves", &self.bondslaves),
            opt_some("bondopts", &self.bondopts),
            opt_list("bridgeslaves", &self.bridgeslaves),
        ]
        .concat();
        writeln!(f, "network {}", options.trim_start())
    }
}

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BootProto {
    /// Use DHCP to obtain an address
    Dhcp,
    /// Use the specified static IPv4 address, requires: `--ip`
    Static,
    Bootp,
    Ibft,
    Query,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum DeviceReference {
    /// The name of the device to configure
    Name(String),
    /// The MAC address of the device to configure
    Mac(MacAddress),
    /// The first device with an active link
    Link,
}

impl From<&str> for DeviceReference {
    fn from(value: &str) -> Self {
        if value == "link" {
            Self::Link
        } else if let Some(mac) = MacAddress::new_from_str(value) {
            Self::Mac(mac)
        } else {
            Self::Name(value.to_string())
        }
    }
}

impl std::fmt::Display for DeviceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceReference::Name(name) => write!(f, "{}", name),
            DeviceReference::Mac(mac) => write!(f, "{}", mac),
            DeviceReference::Link => write!(f, "link"),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct MacAddress {
    pub address: [u8; 6],
}

impl MacAddress {
    fn new_from_str(value: &str) -> Option<Self> {
        let mut address = [0u8; 6];
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 6 {
            return None;
        }

        for (i, part) in parts.iter().enumerate() {
            address[i] = u8::from_str_radix(part, 16).ok()?;
        }

        Some(Self { address })
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let octets: Vec<String> = self.address.iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "{}", octets.join(":"))
    }
}

/// A dotted-quad netmask with contiguous leading ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Netmask(Ipv4Addr);

impl Ipv4Netmask {
    pub fn prefix(&self) -> u8 {
        u32::from(self.0).leading_ones() as u8
    }
}

impl std::str::FromStr for Ipv4Netmask {
    type Err = Box<dyn std::error::Error + Send + Sync>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr = Ipv4Addr::from_str(s)?;
        let mask = u32::from(addr);
        let prefix = mask.leading_ones();
        if (u64::from(mask) << prefix) & 0xffffffff != 0 {
            Err(format!("Invalid netmask: {}", s))?;
        }

        Ok(Self(addr))
    }
}

impl std::fmt::Display for Ipv4Netmask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `network` command
#[derive(Debug, Default)]
pub struct Network {
    base: CommandBase,
    pub devices: Vec<NetworkData>,
}

impl Network {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }

    /// The hostname set by the last network line that has one
    pub fn hostname(&self) -> Option<&str> {
        self.devices
            .iter()
            .rev()
            .find_map(|nd| nd.hostname.as_deref())
    }
}

impl KickstartCommand for Network {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "network"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut nd: NetworkData = ctx.parse_args(tokens)?;

        if nd.device.is_none() && nd.hostname.is_none() && nd.bootproto.is_none() {
            return Err(ctx.value_error(
                "network requires at least one of --device, --hostname or --bootproto",
            ));
        }

        // Bridges and bonds can only be created on a named device
        if (!nd.bondslaves.is_empty() || !nd.bridgeslaves.is_empty())
            && !matches!(nd.device, Some(DeviceReference::Name(_)))
        {
            return Err(ctx.value_error(format!(
                "Only a device NAME can be used for a bond or bridge, not {}",
                nd.device.as_ref().map(|d| d.to_string()).unwrap_or_default(),
            )));
        }

        if let (Some(name), Some(vlanid)) = (nd.interfacename.as_ref(), nd.vlanid) {
            validate_vlan_interface_name(name, vlanid).map_err(|e| ctx.value_error(e))?;
        }

        nd.line = ctx.line().clone();
        ctx.push_data(&mut self.devices, nd, |nd| {
            format!(
                "A network device with the name {} has already been defined",
                nd.device.as_ref().map(|d| d.to_string()).unwrap_or_default()
            )
        });
        Ok(())
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.devices.is_empty() {
            return Ok(());
        }
        writeln!(f, "# Network information")?;
        for nd in &self.devices {
            write!(f, "{nd}")?;
        }
        Ok(())
    }
}

/// Function to check that a vlan interface name follow appropriate conventions.
///
/// If the name contains a dot (.), it must take the form of NAME.ID. The NAME is
/// arbitrary, but the ID must be the VLAN ID. For example: em1.171 or my-vlan.171.
/// Names starting with vlan must take the form of vlanID - for example: vlan171.
fn validate_vlan_interface_name(name: &str, vlanid: u16) -> Result<(), String> {
    if name.contains('.') {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() != 2 {
            Err(format!(
                "VLAN interface name {} must contain exactly one dot",
                name
            ))
        } else if parts[1] != vlanid.to_string() {
            Err(format!(
                "VLAN interface name {} must end with the VLAN ID {}",
                name, vlanid
            ))
        } else {
            Ok(())
        }
    } else if name.starts_with("vlan")
        && name.strip_prefix("vlan") != Some(vlanid.to_string().as_str())
    {
        Err(format!(
            "VLAN interface name {} must contain the VLAN ID {}",
            name, vlanid
        ))
    } else {
        Ok(())
    }
}
