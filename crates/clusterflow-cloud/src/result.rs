//! Result records reported back to the caller

use serde::{Serialize, Serializer};

/// Tri-state outcome of a state check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    /// Dry-run: the change would be made
    Pending,
}

impl Outcome {
    /// `Some(true)`, `Some(false)` or `None` for pending
    pub fn as_option(self) -> Option<bool> {
        match self {
            Outcome::Success => Some(true),
            Outcome::Failure => Some(false),
            Outcome::Pending => None,
        }
    }

    /// Any failure wins, then any pending, otherwise success.
    pub fn combine(outcomes: impl IntoIterator<Item = Outcome>) -> Outcome {
        let mut combined = Outcome::Success;
        for outcome in outcomes {
            match outcome {
                Outcome::Failure => return Outcome::Failure,
                Outcome::Pending => combined = Outcome::Pending,
                Outcome::Success => {}
            }
        }
        combined
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "true"),
            Outcome::Failure => write!(f, "false"),
            Outcome::Pending => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

/// Result of `node_present` / `node_absent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeResult {
    pub name: String,
    pub changes: NodeChanges,
    pub result: Outcome,
    pub comment: String,
}

impl NodeResult {
    pub fn unchanged(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changes: NodeChanges::default(),
            result: Outcome::Success,
            comment: comment.into(),
        }
    }

    pub fn changed(name: impl Into<String>, comment: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            changes: NodeChanges {
                node: Some(name.clone()),
            },
            name,
            result: Outcome::Success,
            comment: comment.into(),
        }
    }

    pub fn pending(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changes: NodeChanges::default(),
            result: Outcome::Pending,
            comment: comment.into(),
        }
    }

    pub fn failed(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changes: NodeChanges::default(),
            result: Outcome::Failure,
            comment: comment.into(),
        }
    }

    pub fn is_changed(&self) -> bool {
        self.changes.node.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterChanges {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
}

/// Result of `present` / `absent` over a whole cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterResult {
    pub name: String,
    pub changes: ClusterChanges,
    pub result: Outcome,
    pub comment: String,
    /// Per-node results in declaration order
    #[serde(skip)]
    pub nodes: Vec<NodeResult>,
}

/// Wording used in cluster comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterAction {
    Create,
    Destroy,
}

impl ClusterAction {
    fn done(self) -> &'static str {
        match self {
            ClusterAction::Create => "created",
            ClusterAction::Destroy => "destroyed",
        }
    }

    fn settled(self) -> &'static str {
        match self {
            ClusterAction::Create => "present",
            ClusterAction::Destroy => "absent",
        }
    }
}

impl ClusterResult {
    /// Fold per-node results into one cluster result
    pub fn aggregate(name: impl Into<String>, action: ClusterAction, nodes: Vec<NodeResult>) -> Self {
        let name = name.into();
        let changes = ClusterChanges {
            nodes: nodes
                .iter()
                .filter_map(|n| n.changes.node.clone())
                .collect(),
        };
        let result = Outcome::combine(nodes.iter().map(|n| n.result));

        let comment = match result {
            Outcome::Success if changes.nodes.is_empty() => {
                format!("Cluster {} already {}", name, action.settled())
            }
            Outcome::Success => format!("Cluster {} {}", name, action.done()),
            Outcome::Pending => format!("Cluster {} is set to be {}", name, action.done()),
            Outcome::Failure => {
                let comments: Vec<&str> = nodes.iter().map(|n| n.comment.as_str()).collect();
                format!(
                    "Cluster {} failed to be {}: {:?}",
                    name,
                    action.done(),
                    comments
                )
            }
        };

        Self {
            name,
            changes,
            result,
            comment,
            nodes,
        }
    }

    /// Failed node results
    pub fn failures(&self) -> impl Iterator<Item = &NodeResult> {
        self.nodes.iter().filter(|n| n.result == Outcome::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_combine() {
        use Outcome::*;
        assert_eq!(Outcome::combine(Vec::new()), Success);
        assert_eq!(Outcome::combine([Success, Success]), Success);
        assert_eq!(Outcome::combine([Success, Pending]), Pending);
        assert_eq!(Outcome::combine([Pending, Failure, Pending]), Failure);
        assert_eq!(Outcome::combine([Success, Failure]), Failure);
    }

    #[test]
    fn test_node_result_json() {
        let changed = NodeResult::changed("web-1", "Cluster node web-1 created");
        assert_eq!(
            serde_json::to_value(&changed).unwrap(),
            json!({
                "name": "web-1",
                "changes": {"node": "web-1"},
                "result": true,
                "comment": "Cluster node web-1 created",
            })
        );

        let pending = NodeResult::pending("web-1", "set to be created");
        let value = serde_json::to_value(&pending).unwrap();
        assert_eq!(value["changes"], json!({}));
        assert!(value["result"].is_null());
    }

    #[test]
    fn test_aggregate_with_failure() {
        let result = ClusterResult::aggregate(
            "jmoney",
            ClusterAction::Create,
            vec![
                NodeResult::changed("a", "Cluster node a created"),
                NodeResult::failed("b", "quota exceeded"),
            ],
        );

        assert_eq!(result.result, Outcome::Failure);
        assert_eq!(result.changes.nodes, vec!["a"]);
        assert!(result.comment.starts_with("Cluster jmoney failed to be created"));
        assert!(result.comment.contains("quota exceeded"));
        assert_eq!(result.failures().count(), 1);
    }

    #[test]
    fn test_aggregate_already_settled() {
        let result = ClusterResult::aggregate(
            "jmoney",
            ClusterAction::Destroy,
            vec![NodeResult::unchanged("a", "Cluster node a already absent")],
        );

        assert_eq!(result.result, Outcome::Success);
        assert_eq!(result.comment, "Cluster jmoney already absent");
        assert_eq!(
            serde_json::to_value(&result).unwrap()["changes"],
            json!({})
        );
    }
}
