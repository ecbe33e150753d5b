//! Root-to-leaf path enumeration.

use crate::step::Step;

/// One concrete path from a node down to a leaf, in execution order.
pub type Chain<'a> = Vec<&'a Step>;

/// Enumerate every root-to-leaf chain rooted at `node`.
///
/// Output order follows slot order (scenario, given, when, then) and then
/// registration order within a slot. A node without children yields `[node]`.
pub fn chains(node: &Step) -> Vec<Chain<'_>> {
    let mut out = Vec::new();
    for child in node.children() {
        for tail in chains(child) {
            let mut chain = Vec::with_capacity(tail.len() + 1);
            chain.push(node);
            chain.extend(tail);
            out.push(chain);
        }
    }
    if out.is_empty() {
        out.push(vec![node]);
    }
    out
}

/// Number of chains rooted at `node`, without materializing them.
pub fn chain_count(node: &Step) -> usize {
    if node.is_leaf() {
        return 1;
    }
    node.children().map(chain_count).sum()
}
