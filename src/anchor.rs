//! Lookup from anchors to the line owning them and the lines ending on them.

use std::collections::HashMap;

use log::trace;

use crate::model::{Endpoint, Line, Pathway};

#[derive(Debug, Default)]
pub struct AnchorIndex<'p> {
    owners: HashMap<&'p str, &'p Line>,
    references: HashMap<&'p str, Vec<(&'p Line, Endpoint)>>,
}

impl<'p> AnchorIndex<'p> {
    pub fn build(pathway: &'p Pathway) -> Self {
        let mut owners = HashMap::new();
        for line in pathway.lines() {
            for anchor in pathway.anchors_of(line) {
                owners.insert(anchor.id.as_str(), line);
            }
        }

        let mut references: HashMap<&'p str, Vec<(&'p Line, Endpoint)>> = HashMap::new();
        for line in pathway.lines() {
            for endpoint in Endpoint::BOTH {
                let Some(reference) = line.reference(endpoint) else {
                    continue;
                };
                if let Some((&anchor_id, _)) = owners.get_key_value(reference) {
                    trace!(line_id = line.id, anchor_id, endpoint:% = endpoint; "Line ends on anchor");
                    references.entry(anchor_id).or_default().push((line, endpoint));
                }
            }
        }

        Self { owners, references }
    }

    pub fn is_anchor(&self, id: &str) -> bool {
        self.owners.contains_key(id)
    }

    pub fn owner_of(&self, anchor_id: &str) -> Option<&'p Line> {
        self.owners.get(anchor_id).copied()
    }

    /// Lines whose start or end references `anchor_id`, in pathway order.
    pub fn referencing_lines(&self, anchor_id: &str) -> &[(&'p Line, Endpoint)] {
        self.references
            .get(anchor_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
