//! Public address extraction from salt-cloud create output
//!
//! Every driver reports a freshly created node differently. This module
//! reduces them all to one reachable address.

use serde_json::Value;
use std::net::Ipv4Addr;

/// salt-cloud driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Driver {
    Linode,
    DigitalOcean,
    Ec2,
    OpenStack,
    Joyent,
    Other(String),
}

impl From<&str> for Driver {
    fn from(name: &str) -> Self {
        match name {
            "linode" => Driver::Linode,
            "digital_ocean" => Driver::DigitalOcean,
            "ec2" => Driver::Ec2,
            "openstack" => Driver::OpenStack,
            "joyent" => Driver::Joyent,
            other => Driver::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Driver::Linode => write!(f, "linode"),
            Driver::DigitalOcean => write!(f, "digital_ocean"),
            Driver::Ec2 => write!(f, "ec2"),
            Driver::OpenStack => write!(f, "openstack"),
            Driver::Joyent => write!(f, "joyent"),
            Driver::Other(name) => write!(f, "{}", name),
        }
    }
}

/// RFC 1918 test on a dotted quad. Anything that is not IPv4 is not private.
pub fn is_private_address(ip: &str) -> bool {
    match ip.parse::<Ipv4Addr>() {
        Ok(addr) => matches!(
            addr.octets(),
            [10, ..] | [172, 16..=31, ..] | [192, 168, ..]
        ),
        Err(_) => false,
    }
}

/// First entry that is IPv4 and not private
fn first_public<'a>(ips: impl IntoIterator<Item = &'a str>) -> Option<String> {
    ips.into_iter()
        .find(|ip| ip.parse::<Ipv4Addr>().is_ok() && !is_private_address(ip))
        .map(str::to_string)
}

fn str_list(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn linode_running(node: &Value) -> bool {
    match node.get("state") {
        Some(Value::String(state)) => state == "Running",
        Some(Value::Number(state)) => state.as_i64() == Some(3),
        _ => false,
    }
}

/// Reachable address of `name` in a create response
pub fn extract_address(driver: &Driver, node_info: &Value, name: &str) -> Option<String> {
    let node = node_info.get(name)?;

    match driver {
        Driver::Linode => {
            if !linode_running(node) {
                return None;
            }
            first_public(str_list(node.get("public_ips")))
        }
        Driver::DigitalOcean => {
            if node.get("status").and_then(Value::as_str) != Some("new") {
                return None;
            }
            let v4 = node
                .get("networks")
                .and_then(|n| n.get("v4"))
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(|net| {
                    net.get("ip_address")
                        .and_then(Value::as_str)
                        .or_else(|| net.as_str())
                });
            first_public(v4)
        }
        Driver::Ec2 => node.get("ipAddress")?.as_str().map(str::to_string),
        Driver::OpenStack => str_list(node.get("public_ips"))
            .find(|ip| ip.parse::<Ipv4Addr>().is_ok())
            .map(str::to_string),
        Driver::Joyent => node.get("primaryIp")?.as_str().map(str::to_string),
        Driver::Other(other) => {
            tracing::warn!(driver = %other, "No address rules for driver");
            None
        }
    }
}
