use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use crate::validation::shape::{id_string, string_field, value_text};

/// Top-level key holding the block list in a multiflow document
pub const MULTIFLOW_KEY: &str = "multiflow_story";

/// Summary and count category for multiflow issues
pub const MULTIFLOW_CATEGORY: &str = "multiflow_stories";

/// Node kind marker for user intents
const KIND_INTENT: &str = "INTENT";

/// Node kind marker for bot utterances
const KIND_BOT: &str = "BOT";

/// Node kind marker for slot values
const KIND_SLOT: &str = "SLOT";

/// Intent and utterance names referenced by multiflow story nodes,
/// in block order with duplicates removed
#[derive(Debug, Clone, Default)]
pub struct MultiflowUsage {
    /// Names of INTENT nodes
    pub intents: Vec<String>,

    /// Names of BOT nodes
    pub utterances: Vec<String>,
}

/// One node of a block graph.
/// Nodes are identified by the (node_id, component_id) pair; the first
/// record with a given pair wins.
struct FlowNode {
    name: String,
    kind: String,
    node_id: String,
}

/// Validate every block of a multiflow stories document.
///
/// Returns the issue list and the declared block count. Malformed blocks
/// are counted: authors should see how many blocks the document claims,
/// not how many survived validation.
pub fn validate_multiflow_stories(document: &Value) -> (Vec<String>, BTreeMap<String, usize>) {
    let mut issues = Vec::new();
    let blocks = document.get(MULTIFLOW_KEY).and_then(Value::as_array);

    let mut count = BTreeMap::new();
    count.insert(
        MULTIFLOW_CATEGORY.to_string(),
        blocks.map(|list| list.len()).unwrap_or(0),
    );

    let blocks = match blocks {
        Some(blocks) => blocks,
        None => return (issues, count),
    };

    let mut seen_names: HashSet<String> = HashSet::new();
    for block in blocks {
        if !block.is_object() {
            issues.push("Invalid multiflow story configuration format. Dictionary expected.".to_string());
            continue;
        }

        let block_name = match string_field(block, "block_name") {
            Some(name) => name,
            None => {
                issues.push("Block name required".to_string());
                continue;
            }
        };

        // A duplicate is reported but its graph is still validated; one
        // pass reports everything it can see
        if !seen_names.insert(block_name.to_string()) {
            issues.push(format!("Duplicate multiflow story found: {}", block_name));
        }

        let events = match block.get("events").and_then(Value::as_array) {
            Some(events) if !events.is_empty() => events,
            _ => {
                issues.push(format!("Events are required to form multiflow story: {}", block_name));
                continue;
            }
        };

        validate_block_graph(block_name, events, block.get("metadata"), &mut issues);
    }

    (issues, count)
}

/// Build the node arena for one block and run the graph checks over it
fn validate_block_graph(block_name: &str, events: &[Value], metadata: Option<&Value>, issues: &mut Vec<String>) {
    let mut nodes: Vec<FlowNode> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut pending_edges: Vec<(usize, (String, String))> = Vec::new();

    // First pass: collect nodes and the raw connection targets. Targets
    // are resolved afterwards so forward references work.
    for event in events {
        let step = match event.get("step") {
            Some(step) if step.is_object() => step,
            _ => {
                issues.push(format!("Invalid step found in multiflow story: {}", block_name));
                continue;
            }
        };

        let node_id = id_string(step.get("node_id"));
        let component_id = id_string(step.get("component_id"));
        let (node_id, component_id) = match (node_id, component_id) {
            (Some(node_id), Some(component_id)) => (node_id, component_id),
            _ => {
                issues.push(format!("Invalid step found in multiflow story: {}", block_name));
                continue;
            }
        };

        let key = (node_id.clone(), component_id);
        if index.contains_key(&key) {
            issues.push(format!("Duplicate node id {} in multiflow story: {}", node_id, block_name));
            continue;
        }

        let node_index = nodes.len();
        nodes.push(FlowNode {
            name: string_field(step, "name").unwrap_or_default().to_string(),
            kind: string_field(step, "type").unwrap_or_default().to_string(),
            node_id,
        });
        index.insert(key, node_index);

        if let Some(connections) = event.get("connections").and_then(Value::as_array) {
            for connection in connections {
                let target_node = id_string(connection.get("node_id"));
                let target_component = id_string(connection.get("component_id"));
                match (target_node, target_component) {
                    (Some(target_node), Some(target_component)) => {
                        pending_edges.push((node_index, (target_node, target_component)));
                    }
                    _ => issues.push(format!("Invalid step found in multiflow story: {}", block_name)),
                }
            }
        }
    }

    // Second pass: resolve edges, dropping the ones pointing nowhere
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (from, target_key) in pending_edges {
        match index.get(&target_key) {
            Some(&to) => {
                adjacency[from].push(to);
                incoming[to].push(from);
                edges.push((from, to));
            }
            None => issues.push(format!(
                "Connection to unknown node id {} in multiflow story: {}",
                target_key.0, block_name
            )),
        }
    }

    // Conversations start with the user: a root that leads anywhere must
    // be an intent. Isolated nodes are handled by the reachability check.
    for (node_index, node) in nodes.iter().enumerate() {
        if incoming[node_index].is_empty() && !adjacency[node_index].is_empty() && node.kind != KIND_INTENT {
            issues.push(format!("First step should be an intent: {}", block_name));
        }
    }

    for &(from, to) in &edges {
        if nodes[from].kind == KIND_INTENT && nodes[to].kind == KIND_INTENT {
            issues.push(format!(
                "Found 2 consecutive intents '{}' and '{}' in multiflow story: {}",
                nodes[from].name, nodes[to].name, block_name
            ));
        }
    }

    for (node_index, node) in nodes.iter().enumerate() {
        if adjacency[node_index].is_empty() && node.kind == KIND_INTENT {
            issues.push(format!(
                "Intent '{}' should be followed by utterance or action in multiflow story: {}",
                node.name, block_name
            ));
        }
    }

    for (node_index, node) in nodes.iter().enumerate() {
        if node.kind == KIND_BOT {
            let reached = incoming[node_index]
                .iter()
                .any(|&from| nodes[from].kind == KIND_INTENT || nodes[from].kind == KIND_SLOT);
            if !reached {
                issues.push(format!(
                    "The bot utterance '{}' is not reachable from any intent in multiflow story: {}",
                    node.name, block_name
                ));
            }
        }
    }

    if has_cycle(&adjacency) {
        issues.push(format!("Multiflow story contains a cycle: {}", block_name));
    }

    if let Some(entries) = metadata.and_then(Value::as_array) {
        let node_ids: HashSet<&str> = nodes.iter().map(|node| node.node_id.as_str()).collect();
        for entry in entries {
            if let Some(node_id) = id_string(entry.get("node_id")) {
                if !node_ids.contains(node_id.as_str()) {
                    issues.push(format!(
                        "Metadata references unknown node id {} in multiflow story: {}",
                        node_id, block_name
                    ));
                }
            }
            if let Some(flow_type) = entry.get("flow_type") {
                let text = value_text(flow_type);
                if text != "STORY" && text != "RULE" {
                    issues.push(format!("Invalid flow type '{}' in multiflow story: {}", text, block_name));
                }
            }
        }
    }
}

/// Depth-first cycle search over the resolved adjacency lists
fn has_cycle(adjacency: &[Vec<usize>]) -> bool {
    let mut visited = vec![false; adjacency.len()];
    let mut in_path = vec![false; adjacency.len()];
    for start in 0..adjacency.len() {
        if !visited[start] && walk_finds_cycle(start, adjacency, &mut visited, &mut in_path) {
            return true;
        }
    }
    false
}

fn walk_finds_cycle(node: usize, adjacency: &[Vec<usize>], visited: &mut [bool], in_path: &mut [bool]) -> bool {
    if in_path[node] {
        return true;
    }
    if visited[node] {
        return false;
    }

    in_path[node] = true;
    for &next in &adjacency[node] {
        if walk_finds_cycle(next, adjacency, visited, in_path) {
            return true;
        }
    }
    in_path[node] = false;
    visited[node] = true;

    false
}

/// Collect the intent and utterance names multiflow nodes refer to, for
/// cross-referencing against the domain. Malformed blocks and steps
/// contribute nothing.
pub fn collect_multiflow_usage(document: &Value) -> MultiflowUsage {
    let mut usage = MultiflowUsage::default();
    let mut seen_intents = HashSet::new();
    let mut seen_utterances = HashSet::new();

    let blocks = match document.get(MULTIFLOW_KEY).and_then(Value::as_array) {
        Some(blocks) => blocks,
        None => return usage,
    };

    for block in blocks {
        let events = match block.get("events").and_then(Value::as_array) {
            Some(events) => events,
            None => continue,
        };
        for event in events {
            let step = match event.get("step") {
                Some(step) if step.is_object() => step,
                _ => continue,
            };
            let name = match string_field(step, "name") {
                Some(name) => name,
                None => continue,
            };
            match string_field(step, "type") {
                Some(kind) if kind == KIND_INTENT => {
                    if seen_intents.insert(name.to_string()) {
                        usage.intents.push(name.to_string());
                    }
                }
                Some(kind) if kind == KIND_BOT => {
                    if seen_utterances.insert(name.to_string()) {
                        usage.utterances.push(name.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    usage
}
