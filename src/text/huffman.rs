//! Huffman prefix codes for short text blobs.
//!
//! The tree is built by repeatedly sorting the forest by frequency and
//! merging the two lightest nodes. Leaves are seeded in first-occurrence
//! order and the sort is stable, so equal inputs always yield equal codes.

use crate::task::types::AnalysisError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Node of a Huffman tree. Children are owned by their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanNode {
    pub symbol: Option<char>,
    pub frequency: usize,
    pub left: Option<Box<HuffmanNode>>,
    pub right: Option<Box<HuffmanNode>>,
}

impl HuffmanNode {
    fn leaf(symbol: char, frequency: usize) -> Self {
        Self {
            symbol: Some(symbol),
            frequency,
            left: None,
            right: None,
        }
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        Self {
            symbol: None,
            frequency: left.frequency + right.frequency,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Code table together with the tree it was derived from
#[derive(Debug, Clone, Serialize)]
pub struct HuffmanCode {
    #[serde(skip)]
    root: Option<HuffmanNode>,
    codes: BTreeMap<char, String>,
}

impl HuffmanCode {
    /// Build codes from the character frequencies of `text`.
    ///
    /// A text with a single distinct character gets the code `"0"`; an
    /// empty text gets an empty table.
    pub fn build(text: &str) -> Self {
        let mut order: Vec<char> = Vec::new();
        let mut counts: HashMap<char, usize> = HashMap::new();
        for c in text.chars() {
            let count = counts.entry(c).or_insert(0);
            if *count == 0 {
                order.push(c);
            }
            *count += 1;
        }

        let mut forest: Vec<HuffmanNode> = order
            .iter()
            .map(|&c| HuffmanNode::leaf(c, counts[&c]))
            .collect();

        while forest.len() > 1 {
            forest.sort_by_key(|node| node.frequency);
            let left = forest.remove(0);
            let right = forest.remove(0);
            forest.push(HuffmanNode::merge(left, right));
        }

        let root = forest.pop();
        let mut codes = BTreeMap::new();
        match &root {
            Some(node) if node.is_leaf() => {
                if let Some(symbol) = node.symbol {
                    codes.insert(symbol, "0".to_string());
                }
            }
            Some(node) => assign_codes(node, String::new(), &mut codes),
            None => {}
        }

        debug!(
            "Built Huffman codes for {} symbols over {} characters",
            codes.len(),
            text.chars().count()
        );
        Self { root, codes }
    }

    /// Character to bit-string table
    pub fn codes(&self) -> &BTreeMap<char, String> {
        &self.codes
    }

    pub fn code_for(&self, symbol: char) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.as_ref()
    }

    /// Concatenate the code of every character of `text`
    pub fn encode(&self, text: &str) -> Result<String, AnalysisError> {
        let mut bits = String::new();
        for c in text.chars() {
            let code = self
                .codes
                .get(&c)
                .ok_or_else(|| AnalysisError::invalid(format!("character {c:?} has no code")))?;
            bits.push_str(code);
        }
        Ok(bits)
    }

    /// Walk the tree bit by bit, emitting a symbol at each leaf
    pub fn decode(&self, bits: &str) -> Result<String, AnalysisError> {
        let Some(root) = &self.root else {
            return if bits.is_empty() {
                Ok(String::new())
            } else {
                Err(AnalysisError::invalid("cannot decode with an empty code table"))
            };
        };

        let mut text = String::new();

        if root.is_leaf() {
            let symbol = root.symbol.unwrap_or_default();
            for bit in bits.chars() {
                match bit {
                    '0' => text.push(symbol),
                    other => return Err(invalid_bit(other)),
                }
            }
            return Ok(text);
        }

        let mut node = root;
        for bit in bits.chars() {
            let next = match bit {
                '0' => node.left.as_deref(),
                '1' => node.right.as_deref(),
                other => return Err(invalid_bit(other)),
            };
            node = next.ok_or_else(|| AnalysisError::invalid("bit path leaves the tree"))?;
            if node.is_leaf() {
                if let Some(symbol) = node.symbol {
                    text.push(symbol);
                }
                node = root;
            }
        }

        if !std::ptr::eq(node, root) {
            return Err(AnalysisError::invalid("bit string ends inside a code"));
        }
        Ok(text)
    }

    /// Encoded length in bits weighted by each symbol's frequency
    pub fn encoded_len(&self, text: &str) -> usize {
        text.chars()
            .filter_map(|c| self.codes.get(&c))
            .map(String::len)
            .sum()
    }
}

fn assign_codes(node: &HuffmanNode, prefix: String, codes: &mut BTreeMap<char, String>) {
    if node.is_leaf() {
        if let Some(symbol) = node.symbol {
            codes.insert(symbol, prefix);
        }
        return;
    }
    if let Some(left) = &node.left {
        assign_codes(left, format!("{prefix}0"), codes);
    }
    if let Some(right) = &node.right {
        assign_codes(right, format!("{prefix}1"), codes);
    }
}

fn invalid_bit(bit: char) -> AnalysisError {
    AnalysisError::invalid(format!("{bit:?} is not a bit"))
}
