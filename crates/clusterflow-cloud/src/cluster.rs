//! Declared cluster layout

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cluster declaration
///
/// ```yaml
/// name: jmoney
/// profiles:
///   - linode-centos-7: [jmoney-master]
///   - linode-ubuntu-15: [jmoney-minion-1, jmoney-minion-2]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDeclaration {
    pub name: String,
    pub profiles: Vec<ProfileNodes>,
}

impl ClusterDeclaration {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// `(profile, node)` pairs in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.profiles.iter().flat_map(|p| {
            p.nodes
                .iter()
                .map(move |node| (p.profile.as_str(), node.as_str()))
        })
    }
}

/// Nodes built from one profile, written as a single-key mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct ProfileNodes {
    pub profile: String,
    pub nodes: Vec<String>,
}

impl ProfileNodes {
    pub fn new(profile: impl Into<String>, nodes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            profile: profile.into(),
            nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for ProfileNodes {
    type Error = String;

    fn try_from(map: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "each profiles entry must map exactly one profile to its nodes, found {}",
                map.len()
            ));
        }
        let (profile, nodes) = map.into_iter().next().ok_or("empty profiles entry")?;
        Ok(Self { profile, nodes })
    }
}

impl From<ProfileNodes> for BTreeMap<String, Vec<String>> {
    fn from(entry: ProfileNodes) -> Self {
        [(entry.profile, entry.nodes)].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declaration() {
        let declaration = ClusterDeclaration::from_yaml(
            "name: jmoney\nprofiles:\n  - linode-centos-7: [master]\n  - linode-ubuntu-15:\n      - minion-1\n      - minion-2\n",
        )
        .unwrap();

        assert_eq!(declaration.name, "jmoney");
        let nodes: Vec<_> = declaration.nodes().collect();
        assert_eq!(
            nodes,
            vec![
                ("linode-centos-7", "master"),
                ("linode-ubuntu-15", "minion-1"),
                ("linode-ubuntu-15", "minion-2"),
            ]
        );
    }

    #[test]
    fn test_reject_multi_key_entry() {
        let result = ClusterDeclaration::from_yaml(
            "name: jmoney\nprofiles:\n  - a: [x]\n    b: [y]\n",
        );
        assert!(result.is_err());
    }
}
