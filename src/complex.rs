use log::debug;

use crate::identity::{IriScheme, ParticipantCache, ParticipantIdentity};
use crate::interaction::{InteractionKind, Participant, ParticipantSet, ResolvedComplex, ResolvedInteraction};
use crate::model::{Group, GroupKind, Pathway};
use crate::report::DropReason;

/// Resolve a complex group into a composite identity bound to its members.
///
/// Returns `Ok(None)` for groups that are not complexes. Members are the group's
/// data nodes that already have a cached identity; a member data node of type
/// `Complex` describes the complex itself and is not counted. Fewer than two
/// counted members is a degenerate complex.
pub fn resolve_complex(
    pathway: &Pathway,
    cache: &ParticipantCache,
    scheme: &IriScheme,
    group: &Group,
) -> Result<Option<ResolvedComplex>, DropReason> {
    if group.kind != GroupKind::Complex {
        return Ok(None);
    }

    let mut embedded_node: Option<String> = None;
    let mut members = ParticipantSet::new();
    for node in pathway.group_members(&group.id) {
        if node.is_complex() {
            match &embedded_node {
                None => embedded_node = Some(node.id.clone()),
                Some(first) => {
                    debug!(group_id = group.id, element_id = node.id, first; "Ignoring extra complex data node")
                }
            }
            continue;
        }
        match cache.get(&node.id) {
            Some(identity) => {
                members.insert(Participant::Node {
                    element_id: node.id.clone(),
                    identity: identity.clone(),
                });
            }
            None => debug!(group_id = group.id, element_id = node.id; "Complex member has no identity"),
        }
    }

    if members.len() < 2 {
        return Err(DropReason::DegenerateComplex {
            resolved: members.len(),
        });
    }

    let embedded_label = embedded_node
        .as_deref()
        .and_then(|id| pathway.group_members(&group.id).find(|node| node.id == id))
        .filter(|node| {
            node.xref
                .as_ref()
                .is_some_and(|xref| !xref.identifier.trim().is_empty())
        })
        .map(|node| node.label.as_str());
    let labels: Vec<String> = [Some(group.label.as_str()), embedded_label]
        .into_iter()
        .flatten()
        .map(|label| label.replace('\n', " ").trim().to_string())
        .filter(|label| !label.is_empty())
        .collect();

    let mut binding = ResolvedInteraction::new(group.id.clone(), InteractionKind::Undirected);
    binding.others = members.clone();

    Ok(Some(ResolvedComplex {
        group_id: group.id.clone(),
        labels,
        identity: ParticipantIdentity::new(scheme.complex(&group.id)),
        embedded_node,
        members,
        binding,
    }))
}
