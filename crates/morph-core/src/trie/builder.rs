use std::collections::BTreeMap;

use super::{FLAG_TERMINAL, MAGIC, VERSION};
use crate::format;

#[derive(Debug, Default, Clone)]
struct BuildNode {
    children: BTreeMap<u8, usize>,
    payloads: Vec<u32>,
}

/// In-memory trie accumulator that serializes to the `MTRI` format.
///
/// Nodes are numbered in creation order, which guarantees every child gets
/// a larger index than its parent. Subtrees are not shared.
#[derive(Debug, Clone)]
pub struct TrieBuilder {
    nodes: Vec<BuildNode>,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![BuildNode::default()],
        }
    }

    /// Append `payload` to the list stored under `key`. Payload order per
    /// key is insertion order.
    pub fn insert(&mut self, key: &[u8], payload: u32) {
        let mut node = 0;
        for &b in key {
            node = match self.nodes[node].children.get(&b) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(BuildNode::default());
                    self.nodes[node].children.insert(b, child);
                    child
                }
            };
        }
        self.nodes[node].payloads.push(payload);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let edge_count: usize = self.nodes.iter().map(|n| n.children.len()).sum();
        let payload_count: usize = self.nodes.iter().map(|n| n.payloads.len()).sum();

        let mut buf = Vec::new();
        format::write_header(&mut buf, MAGIC, VERSION, self.nodes.len() as u32);
        buf.extend_from_slice(&(edge_count as u32).to_le_bytes());
        buf.extend_from_slice(&(payload_count as u32).to_le_bytes());

        let (mut first_edge, mut first_payload) = (0u32, 0u32);
        for node in &self.nodes {
            let flags = if node.payloads.is_empty() {
                0
            } else {
                FLAG_TERMINAL
            };
            buf.extend_from_slice(&first_edge.to_le_bytes());
            buf.extend_from_slice(&(node.children.len() as u16).to_le_bytes());
            buf.extend_from_slice(&flags.to_le_bytes());
            buf.extend_from_slice(&first_payload.to_le_bytes());
            buf.extend_from_slice(&(node.payloads.len() as u32).to_le_bytes());
            first_edge += node.children.len() as u32;
            first_payload += node.payloads.len() as u32;
        }
        for node in &self.nodes {
            for (&label, &target) in &node.children {
                buf.push(label);
                buf.extend_from_slice(&(target as u32).to_le_bytes());
            }
        }
        for node in &self.nodes {
            for p in &node.payloads {
                buf.extend_from_slice(&p.to_le_bytes());
            }
        }
        buf
    }
}
