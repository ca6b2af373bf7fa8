//! Set families, set types and the description of an existing set.

use std::fmt::{self, Formatter};
use std::str::FromStr;

use ipset_session_derive::SetType;

use crate::error::Error;

/// Protocol family of the addresses stored in a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Family {
    #[default]
    Inet,
    Inet6,
    /// A family this crate does not know, kept as the engine printed it.
    Other(String),
}

impl Family {
    pub fn as_str(&self) -> &str {
        match self {
            Family::Inet => "inet",
            Family::Inet6 => "inet6",
            Family::Other(family) => family,
        }
    }
}

impl From<&str> for Family {
    fn from(value: &str) -> Self {
        match value {
            "inet" => Family::Inet,
            "inet6" => Family::Inet6,
            other => Family::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set type comprises of the storage method by which the data is stored and the data type(s) which are stored in the set.
/// Therefore the TYPENAME parameter  of the create command follows the syntax
/// `TYPENAME := method:datatype[,datatype[,datatype]]`
/// where the current list of the methods are bitmap, hash, and list and the possible data types are ip, net, mac, port and iface.
pub trait SetType {
    const TYPENAME: &'static str;
    /// Whether `create` accepts a `family` option for this type.
    const FAMILY: bool;
}

/// The hash:ip set type uses a hash to store IP host addresses (default) or network addresses.
/// Zero valued IP address cannot be stored in a hash:ip type of set.
#[derive(SetType)]
pub struct HashIp;

/// The hash:mac set type uses a hash to store MAC addresses. It has no family.
#[derive(SetType)]
pub struct HashMac;

/// The hash:ip,mac set type uses a hash to store IP and a MAC address pairs.
#[derive(SetType)]
pub struct HashIpMac;

/// The hash:net set type uses a hash to store different sized IP network addresses.
#[derive(SetType)]
pub struct HashNet;

/// The hash:ip,port set type uses a hash to store IP address and port number pairs.
#[derive(SetType)]
pub struct HashIpPort;

/// The hash:net,port set type uses a hash to store different sized IP network address and port pairs.
#[derive(SetType)]
pub struct HashNetPort;

/// The list:set type uses a simple list in which you can store set names. It has no family.
#[derive(SetType)]
pub struct ListSet;

/// Options of the `create` command. `family` is left out of the command when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub typename: String,
    pub family: Option<Family>,
    pub timeout: Option<u32>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            typename: HashIp::TYPENAME.to_string(),
            family: Some(Family::Inet),
            timeout: None,
        }
    }
}

impl CreateOptions {
    /// A `hash:ip` set of family `inet` without default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the type `T`. A type without family drops the family option; one
    /// with a family keeps the current family, `inet` if none was set.
    pub fn with_type<T: SetType>(mut self) -> Self {
        self.family = if T::FAMILY {
            self.family.or(Some(Family::Inet))
        } else {
            None
        };
        self.with_typename(T::TYPENAME)
    }

    /// Use a type name the [`SetType`] markers do not cover.
    pub fn with_typename(mut self, typename: impl Into<String>) -> Self {
        self.typename = typename.into();
        self
    }

    /// It defines the protocol family of the IP addresses to be stored in the set. The default is inet, i.e IPv4.
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = Some(family);
        self
    }

    /// Leave the family out of the command, for types like `hash:mac` or `list:set`.
    pub fn without_family(mut self) -> Self {
        self.family = None;
        self
    }

    /// The default timeout value (in seconds) for new entries.
    /// Zero timeout value means the entry is added permanent to the set.
    pub fn with_timeout(mut self, timeout: u32) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Properties of an existing set, parsed from the first line of `save` output.
/// `family` is `None` when the engine printed none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDescriptor {
    pub name: String,
    pub typename: String,
    pub family: Option<Family>,
    pub timeout: Option<u32>,
}

impl SetDescriptor {
    pub fn to_create_options(&self) -> CreateOptions {
        CreateOptions {
            typename: self.typename.clone(),
            family: self.family.clone(),
            timeout: self.timeout,
        }
    }
}

impl FromStr for SetDescriptor {
    type Err = Error;

    /// Parse `create <name> <type> [<key> <value>]...`. Unknown keys and
    /// timeouts that are not a number are skipped. Every adjacent token pair is
    /// tried, since flags like `counters` carry no value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.lines().next().unwrap_or_default();
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(Error::InvalidOutput(line.to_string()));
        }

        let mut descriptor = SetDescriptor {
            name: fields[1].to_string(),
            typename: fields[2].to_string(),
            family: None,
            timeout: None,
        };
        for pair in fields[3..].windows(2) {
            match pair[0] {
                "family" => descriptor.family = Some(Family::from(pair[1])),
                "timeout" => {
                    if let Ok(timeout) = pair[1].parse() {
                        descriptor.timeout = Some(timeout);
                    }
                }
                _ => {}
            }
        }
        Ok(descriptor)
    }
}

impl fmt::Display for SetDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<create {} {}", self.name, self.typename)?;
        if let Some(family) = &self.family {
            write!(f, " family {}", family)?;
        }
        if let Some(timeout) = self.timeout {
            write!(f, " timeout {}", timeout)?;
        }
        write!(f, ">")
    }
}
