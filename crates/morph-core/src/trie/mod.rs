//! Read-only byte-keyed trie with `u32` payload lists.
//!
//! On-disk layout (little-endian):
//!
//! ```text
//! header   "MTRI" | version u16 | node_count u32
//! counts   edge_count u32 | payload_count u32
//! nodes    node_count x { first_edge u32, edge_len u16, flags u16,
//!                         first_payload u32, payload_len u32 }
//! edges    edge_count x { label u8, target u32 }
//! payloads payload_count x u32
//! ```
//!
//! Node 0 is the root. Each node's edges are sorted by strictly ascending
//! label and every edge target is greater than its source index, so the
//! graph is acyclic while still allowing shared (DAWG-style) subtrees.

mod builder;


pub use builder::TrieBuilder;

use tracing::debug;

use crate::error::FormatError;
use crate::format::{self, ByteReader};

pub const MAGIC: &[u8; 4] = b"MTRI";
pub const VERSION: u16 = 1;

const SECTION: &str = "trie";
const NODE_SIZE: usize = 16;
const EDGE_SIZE: usize = 5;
const FLAG_TERMINAL: u16 = 1;
const ROOT: u32 = 0;

#[derive(Debug, Clone, Copy)]
struct Node {
    first_edge: u32,
    edge_len: u16,
    flags: u16,
    first_payload: u32,
    payload_len: u32,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    label: u8,
    target: u32,
}

/// A decoded, fully validated trie. Lookups never fail on a trie that
/// `from_bytes` accepted.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    payloads: Vec<u32>,
}

impl Trie {
    /// Decode and validate a serialized trie.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let (node_count, mut r) = format::parse_header(data, SECTION, MAGIC, VERSION)?;
        let edge_count = r.u32()?;
        let payload_count = r.u32()?;

        if node_count == 0 {
            return Err(r.malformed("trie has no root node"));
        }
        let expected = (node_count as usize)
            .checked_mul(NODE_SIZE)
            .and_then(|n| n.checked_add(edge_count as usize * EDGE_SIZE))
            .and_then(|n| n.checked_add(payload_count as usize * 4));
        match expected {
            Some(n) if n > r.remaining() => {
                return Err(FormatError::Truncated {
                    section: SECTION,
                    offset: data.len(),
                })
            }
            Some(_) => {}
            None => return Err(r.malformed("section sizes overflow")),
        }

        let mut nodes = Vec::with_capacity(node_count as usize);
        for _ in 0..node_count {
            nodes.push(Node {
                first_edge: r.u32()?,
                edge_len: r.u16()?,
                flags: r.u16()?,
                first_payload: r.u32()?,
                payload_len: r.u32()?,
            });
        }
        let mut edges = Vec::with_capacity(edge_count as usize);
        for _ in 0..edge_count {
            edges.push(Edge {
                label: r.u8()?,
                target: r.u32()?,
            });
        }
        let mut payloads = Vec::with_capacity(payload_count as usize);
        for _ in 0..payload_count {
            payloads.push(r.u32()?);
        }
        r.finish()?;

        let trie = Self {
            nodes,
            edges,
            payloads,
        };
        trie.validate(&r)?;
        debug!(
            nodes = trie.nodes.len(),
            edges = trie.edges.len(),
            payloads = trie.payloads.len(),
            "trie decoded"
        );
        Ok(trie)
    }

    fn validate(&self, r: &ByteReader<'_>) -> Result<(), FormatError> {
        let node_count = self.nodes.len() as u64;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.flags & !FLAG_TERMINAL != 0 {
                return Err(r.malformed(format!("node {i}: unknown flags {:#06x}", node.flags)));
            }
            let edge_end = node.first_edge as u64 + node.edge_len as u64;
            if edge_end > self.edges.len() as u64 {
                return Err(r.malformed(format!("node {i}: edge range out of bounds")));
            }
            let payload_end = node.first_payload as u64 + node.payload_len as u64;
            if payload_end > self.payloads.len() as u64 {
                return Err(r.malformed(format!("node {i}: payload range out of bounds")));
            }
            let terminal = node.flags & FLAG_TERMINAL != 0;
            if terminal != (node.payload_len > 0) {
                return Err(r.malformed(format!(
                    "node {i}: terminal flag disagrees with payload count {}",
                    node.payload_len
                )));
            }
            let edges = &self.edges[node.first_edge as usize..edge_end as usize];
            for pair in edges.windows(2) {
                if pair[0].label >= pair[1].label {
                    return Err(r.malformed(format!("node {i}: edges not strictly ascending")));
                }
            }
            for edge in edges {
                if edge.target as u64 <= i as u64 || edge.target as u64 >= node_count {
                    return Err(r.malformed(format!(
                        "node {i}: edge {:#04x} targets invalid node {}",
                        edge.label, edge.target
                    )));
                }
            }
        }
        Ok(())
    }

    /// Payloads stored under exactly `key`, or `None` if the key is absent.
    pub fn lookup(&self, key: &[u8]) -> Option<&[u32]> {
        let node = self.follow(ROOT, key)?;
        self.payloads_of(node)
    }

    /// Whether `key` is stored.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.lookup(key).is_some()
    }

    /// Iterate every key that starts with `prefix`, in pre-order with
    /// children visited by ascending byte. The yielded keys include the
    /// prefix.
    pub fn iter_prefixed(&self, prefix: &[u8]) -> PrefixIter<'_> {
        let start = self.follow(ROOT, prefix);
        PrefixIter {
            trie: self,
            key: prefix.to_vec(),
            stack: start
                .map(|node| vec![Frame { node, next_edge: 0 }])
                .unwrap_or_default(),
            pending: start,
        }
    }

    /// Iterate every key in the trie.
    pub fn iter(&self) -> PrefixIter<'_> {
        self.iter_prefixed(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn payload_count(&self) -> usize {
        self.payloads.len()
    }

    /// Every payload in storage order, for bulk validation.
    pub fn payloads(&self) -> &[u32] {
        &self.payloads
    }

    fn follow(&self, from: u32, key: &[u8]) -> Option<u32> {
        key.iter().try_fold(from, |node, &b| self.child(node, b))
    }

    fn child(&self, node: u32, label: u8) -> Option<u32> {
        let edges = self.edges_of(node);
        edges
            .binary_search_by_key(&label, |e| e.label)
            .ok()
            .map(|i| edges[i].target)
    }

    fn edges_of(&self, node: u32) -> &[Edge] {
        let n = &self.nodes[node as usize];
        let start = n.first_edge as usize;
        &self.edges[start..start + n.edge_len as usize]
    }

    fn payloads_of(&self, node: u32) -> Option<&[u32]> {
        let n = &self.nodes[node as usize];
        if n.flags & FLAG_TERMINAL == 0 {
            return None;
        }
        let start = n.first_payload as usize;
        Some(&self.payloads[start..start + n.payload_len as usize])
    }
}

#[derive(Debug, Clone)]
struct Frame {
    node: u32,
    next_edge: u16,
}

/// Depth-first walk below a prefix. Cloning the iterator restarts from the
/// clone's position; calling `iter_prefixed` again restarts from scratch.
#[derive(Debug, Clone)]
pub struct PrefixIter<'a> {
    trie: &'a Trie,
    key: Vec<u8>,
    stack: Vec<Frame>,
    /// Start node whose own payload has not been reported yet.
    pending: Option<u32>,
}

impl<'a> Iterator for PrefixIter<'a> {
    type Item = (Vec<u8>, &'a [u32]);

    fn next(&mut self) -> Option<Self::Item> {
        let trie = self.trie;
        if let Some(start) = self.pending.take() {
            if let Some(p) = trie.payloads_of(start) {
                return Some((self.key.clone(), p));
            }
        }
        loop {
            let frame = self.stack.last_mut()?;
            let edges = trie.edges_of(frame.node);
            match edges.get(frame.next_edge as usize).copied() {
                Some(edge) => {
                    frame.next_edge += 1;
                    self.key.push(edge.label);
                    self.stack.push(Frame {
                        node: edge.target,
                        next_edge: 0,
                    });
                    if let Some(p) = trie.payloads_of(edge.target) {
                        return Some((self.key.clone(), p));
                    }
                }
                None => {
                    self.stack.pop();
                    // The start frame owns the prefix bytes, not an edge label.
                    if !self.stack.is_empty() {
                        self.key.pop();
                    }
                }
            }
        }
    }
}
