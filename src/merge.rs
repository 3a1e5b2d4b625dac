//! Merging of lines joined through anchors into one logical interaction.

use std::collections::HashSet;

use log::{debug, trace};

use crate::anchor::AnchorIndex;
use crate::model::{Endpoint, Line, Pathway};
use crate::report::DropReason;

/// Lines folded into one interaction, plus the lines regulating it.
#[derive(Debug)]
pub struct LineMerge<'p> {
    /// Primary line first, then continuations in discovery order.
    pub merged: Vec<&'p Line>,
    pub regulatory: Vec<&'p Line>,
}

impl LineMerge<'_> {
    pub fn primary(&self) -> &Line {
        self.merged[0]
    }

    pub fn contains(&self, line_id: &str) -> bool {
        self.merged.iter().any(|line| line.id == line_id)
    }
}

/// Reject a primary line whose own start or end names nothing in the pathway.
pub fn check_references(pathway: &Pathway, line: &Line) -> Result<(), DropReason> {
    for endpoint in Endpoint::BOTH {
        if let Some(reference) = line.reference(endpoint) {
            if pathway.lookup(reference).is_none() {
                return Err(DropReason::DanglingReference {
                    reference: reference.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// The anchor-owning line that `line` continues, if it ends undirected on one of its anchors.
fn continued_line<'p>(index: &AnchorIndex<'p>, line: &Line) -> Option<&'p Line> {
    Endpoint::BOTH.into_iter().find_map(|endpoint| {
        let reference = line.reference(endpoint)?;
        if !line.arrow(endpoint).is_undirected() {
            return None;
        }
        index.owner_of(reference).filter(|owner| owner.id != line.id)
    })
}

/// Walk up undirected anchor continuations from `line` to the line a merge should start from.
///
/// Lines in `visited` are never stepped into; anchor cycles stop at the last unvisited line.
pub fn primary_for<'p>(index: &AnchorIndex<'p>, line: &'p Line, visited: &HashSet<&str>) -> &'p Line {
    let mut seen: HashSet<&str> = HashSet::from([line.id.as_str()]);
    let mut current = line;
    while let Some(owner) = continued_line(index, current) {
        if visited.contains(owner.id.as_str()) {
            break;
        }
        if !seen.insert(owner.id.as_str()) {
            debug!(line_id = line.id, owner_id = owner.id; "Anchor chain loops back on itself");
            break;
        }
        current = owner;
    }
    current
}

/// Gather every line that continues `primary` through its anchors, transitively.
///
/// A line ending on a merged line's anchor with an undirected head at that end is
/// merged; any other head makes it a regulatory line. Lines in `visited` already
/// belong to another interaction and are left alone.
pub fn merge_lines<'p>(index: &AnchorIndex<'p>, primary: &'p Line, visited: &HashSet<&str>) -> LineMerge<'p> {
    let mut merged = vec![primary];
    let mut merged_ids: HashSet<&str> = HashSet::from([primary.id.as_str()]);
    let mut regulatory: Vec<&'p Line> = Vec::new();

    let mut next = 0;
    while next < merged.len() {
        let line = merged[next];
        next += 1;
        for anchor in &line.anchors {
            for &(candidate, endpoint) in index.referencing_lines(&anchor.id) {
                if merged_ids.contains(candidate.id.as_str()) {
                    continue;
                }
                if visited.contains(candidate.id.as_str()) {
                    debug!(line_id = candidate.id, anchor_id = anchor.id; "Line already belongs to another interaction");
                    continue;
                }
                if candidate.arrow(endpoint).is_undirected() {
                    trace!(line_id = candidate.id, anchor_id = anchor.id; "Merging continuation line");
                    merged_ids.insert(candidate.id.as_str());
                    merged.push(candidate);
                } else if !regulatory.iter().any(|l| l.id == candidate.id) {
                    trace!(line_id = candidate.id, anchor_id = anchor.id; "Line regulates the interaction");
                    regulatory.push(candidate);
                }
            }
        }
    }

    regulatory.retain(|line| !merged_ids.contains(line.id.as_str()));
    LineMerge { merged, regulatory }
}
