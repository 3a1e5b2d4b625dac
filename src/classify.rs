//! Resolution of line endpoints to participants and their source/target/other roles.

use log::{debug, trace};

use crate::anchor::AnchorIndex;
use crate::identity::ParticipantCache;
use crate::interaction::{InteractionKind, Participant, ParticipantSet};
use crate::merge::LineMerge;
use crate::model::{Element, Endpoint, Line, Pathway};
use crate::report::{DropReason, Report};

#[derive(Debug, Default)]
pub struct Classified {
    pub sources: ParticipantSet,
    pub targets: ParticipantSet,
    pub others: ParticipantSet,
}

impl Classified {
    fn all(&self) -> impl Iterator<Item = &Participant> {
        self.sources
            .iter()
            .chain(self.targets.iter())
            .chain(self.others.iter())
    }

    pub fn has_node(&self) -> bool {
        self.all().any(Participant::is_node)
    }

    /// Check that at least one participant is a data node.
    pub fn require_node(&self) -> Result<(), DropReason> {
        if self.has_node() {
            return Ok(());
        }
        let (groups, lines) = self.all().fold((0, 0), |(groups, lines), p| match p {
            Participant::Group { .. } => (groups + 1, lines),
            Participant::Interaction { .. } => (groups, lines + 1),
            Participant::Node { .. } => (groups, lines),
        });
        Err(DropReason::UnsupportedParticipantShape { groups, lines })
    }
}

enum EndpointTarget {
    Participant(Participant),
    NotAParticipant(&'static str),
    Dangling,
}

pub struct Classifier<'a, 'p> {
    pathway: &'p Pathway,
    cache: &'a ParticipantCache,
    index: &'a AnchorIndex<'p>,
}

impl<'a, 'p> Classifier<'a, 'p> {
    pub fn new(pathway: &'p Pathway, cache: &'a ParticipantCache, index: &'a AnchorIndex<'p>) -> Self {
        Self {
            pathway,
            cache,
            index,
        }
    }

    /// Participant for another line, named by that line's own id.
    ///
    /// The line may not be merged yet; [`crate::resolve::Resolver`] renames it to
    /// the interaction it ends up in once every line is resolved.
    fn interaction_of(&self, line: &Line, merge: &LineMerge<'_>) -> EndpointTarget {
        if merge.contains(&line.id) {
            return EndpointTarget::NotAParticipant("junction inside the interaction itself");
        }
        EndpointTarget::Participant(Participant::Interaction {
            element_id: line.id.clone(),
        })
    }

    fn resolve(&self, reference: &str, merge: &LineMerge<'_>) -> EndpointTarget {
        match self.pathway.lookup(reference) {
            None => EndpointTarget::Dangling,
            Some(Element::DataNode(node)) => match self.cache.get(&node.id) {
                Some(identity) => EndpointTarget::Participant(Participant::Node {
                    element_id: node.id.clone(),
                    identity: identity.clone(),
                }),
                None => EndpointTarget::NotAParticipant("data node has no resolved identity"),
            },
            Some(Element::Group(group)) => EndpointTarget::Participant(Participant::Group {
                element_id: group.id.clone(),
            }),
            Some(Element::Line(line)) => self.interaction_of(line, merge),
            Some(Element::Anchor(_)) => match self.index.owner_of(reference) {
                Some(owner) => self.interaction_of(owner, merge),
                None => EndpointTarget::Dangling,
            },
            Some(Element::Decoration) => EndpointTarget::NotAParticipant("label, shape or graphical line"),
        }
    }

    /// Bucket every resolvable endpoint of the merged lines.
    ///
    /// Undirected interactions put everything in `others`. Otherwise each endpoint is
    /// classified by its own arrowhead: undirected marks the source, anything else
    /// the target.
    pub fn classify(&self, merge: &LineMerge<'_>, kind: &InteractionKind, report: &mut Report) -> Classified {
        let mut classified = Classified::default();
        for line in &merge.merged {
            for endpoint in Endpoint::BOTH {
                let Some(reference) = line.reference(endpoint) else {
                    continue;
                };
                let participant = match self.resolve(reference, merge) {
                    EndpointTarget::Participant(participant) => participant,
                    EndpointTarget::NotAParticipant(why) => {
                        debug!(line_id = line.id, endpoint:% = endpoint, reference, why; "Endpoint is not a participant");
                        continue;
                    }
                    EndpointTarget::Dangling => {
                        report.drop_endpoint(
                            &line.id,
                            endpoint,
                            DropReason::DanglingReference {
                                reference: reference.to_string(),
                            },
                        );
                        continue;
                    }
                };

                let bucket = if kind.is_undirected() {
                    &mut classified.others
                } else if line.arrow(endpoint).is_undirected() {
                    &mut classified.sources
                } else {
                    &mut classified.targets
                };
                trace!(line_id = line.id, endpoint:% = endpoint, participant:% = participant; "Classified endpoint");
                bucket.insert(participant);
            }
        }
        classified
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::identity::ParticipantIdentity;
    use crate::model::{ArrowHead, DataNode, Group, GroupKind};
    use crate::report::DropScope;

    fn node(id: &str) -> Participant {
        Participant::Node {
            element_id: id.to_string(),
            identity: ParticipantIdentity::new(format!("urn:test:{id}")),
        }
    }

    fn fixture(lines: Vec<Line>) -> (Pathway, ParticipantCache) {
        let mut pathway = Pathway::new("test");
        let mut cache = ParticipantCache::new();
        for id in ["a", "b", "c"] {
            pathway
                .add_data_node(DataNode::new(id, id.to_uppercase(), "Protein"))
                .unwrap();
            cache
                .put(id, ParticipantIdentity::new(format!("urn:test:{id}")))
                .unwrap();
        }
        pathway
            .add_data_node(DataNode::new("unmapped", "?", "Unknown"))
            .unwrap();
        pathway
            .add_group(Group::new("g", GroupKind::Group))
            .unwrap();
        for line in lines {
            pathway.add_line(line).unwrap();
        }
        (pathway, cache)
    }

    fn run(pathway: &Pathway, cache: &ParticipantCache, primary: usize, kind: InteractionKind) -> (Classified, Report) {
        let index = AnchorIndex::build(pathway);
        let merge = crate::merge::merge_lines(&index, &pathway.lines()[primary], &HashSet::new());
        let mut report = Report::default();
        let classified = Classifier::new(pathway, cache, &index).classify(&merge, &kind, &mut report);
        (classified, report)
    }

    #[test]
    fn directed_line_has_source_and_target() {
        let (pathway, cache) = fixture(vec![Line::new("l1")
            .from_ref("a", ArrowHead::Undirected)
            .to_ref("b", ArrowHead::Directed)]);
        let (classified, report) = run(&pathway, &cache, 0, InteractionKind::Directed);

        assert_eq!(classified.sources.iter().cloned().collect::<Vec<_>>(), vec![node("a")]);
        assert_eq!(classified.targets.iter().cloned().collect::<Vec<_>>(), vec![node("b")]);
        assert!(classified.others.is_empty());
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn undirected_interaction_puts_everyone_in_others() {
        let (pathway, cache) = fixture(vec![
            Line::new("l1")
                .from_ref("a", ArrowHead::Undirected)
                .to_ref("b", ArrowHead::Undirected)
                .with_anchor("x", 0.5),
            Line::new("l2")
                .from_ref("c", ArrowHead::Undirected)
                .to_ref("x", ArrowHead::Undirected),
        ]);
        let (classified, _) = run(&pathway, &cache, 0, InteractionKind::Undirected);

        assert!(classified.sources.is_empty());
        assert!(classified.targets.is_empty());
        // The anchor junction joining l2 to l1 is not a participant of its own.
        assert_eq!(
            classified.others.iter().cloned().collect::<Vec<_>>(),
            vec![node("a"), node("b"), node("c")]
        );
    }

    // Each endpoint is bucketed by its own arrowhead. A line with heads at both ends
    // therefore has two targets and no source. Earlier converters keyed both ends off
    // the start arrowhead and would have made `a` a target and `b` a source; confirm
    // with a domain expert before changing this.
    #[test]
    fn bucketing_uses_each_endpoints_own_arrowhead() {
        let (pathway, cache) = fixture(vec![Line::new("l1")
            .from_ref("a", ArrowHead::Directed)
            .to_ref("b", ArrowHead::Directed)]);
        let (classified, _) = run(&pathway, &cache, 0, InteractionKind::Directed);

        assert!(classified.sources.is_empty());
        assert_eq!(
            classified.targets.iter().cloned().collect::<Vec<_>>(),
            vec![node("a"), node("b")]
        );
    }

    #[test]
    fn anchor_on_another_interaction_resolves_to_that_interaction() {
        let (pathway, cache) = fixture(vec![
            Line::new("l1")
                .from_ref("a", ArrowHead::Undirected)
                .to_ref("b", ArrowHead::Directed)
                .with_anchor("x", 0.5),
            Line::new("l2")
                .from_ref("c", ArrowHead::Undirected)
                .to_ref("x", ArrowHead::Catalysis),
        ]);
        let (classified, _) = run(&pathway, &cache, 1, InteractionKind::Catalysis);

        assert_eq!(classified.sources.iter().cloned().collect::<Vec<_>>(), vec![node("c")]);
        assert_eq!(
            classified.targets.iter().cloned().collect::<Vec<_>>(),
            vec![Participant::Interaction {
                element_id: "l1".to_string()
            }]
        );
    }

    #[test]
    fn dangling_endpoint_is_dropped_and_reported() {
        let (pathway, cache) = fixture(vec![
            Line::new("l1")
                .from_ref("a", ArrowHead::Undirected)
                .to_ref("b", ArrowHead::Directed)
                .with_anchor("x", 0.5),
            Line::new("l2")
                .from_ref("ghost", ArrowHead::Undirected)
                .to_ref("x", ArrowHead::Undirected),
        ]);
        let (classified, report) = run(&pathway, &cache, 0, InteractionKind::Directed);

        assert_eq!(classified.sources.len(), 1);
        assert_eq!(report.diagnostics().len(), 1);
        assert_eq!(report.diagnostics()[0].element_id, "l2");
        assert_eq!(report.diagnostics()[0].scope, DropScope::Endpoint(Endpoint::Start));
    }

    #[test]
    fn unmapped_nodes_are_skipped_without_a_report() {
        let (pathway, cache) = fixture(vec![Line::new("l1")
            .from_ref("unmapped", ArrowHead::Undirected)
            .to_ref("b", ArrowHead::Directed)]);
        let (classified, report) = run(&pathway, &cache, 0, InteractionKind::Directed);

        assert!(classified.sources.is_empty());
        assert_eq!(classified.targets.len(), 1);
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn group_only_participants_are_unsupported() {
        let (pathway, cache) = fixture(vec![Line::new("l1")
            .from_ref("g", ArrowHead::Undirected)
            .to_ref("g", ArrowHead::Directed)]);
        let (classified, _) = run(&pathway, &cache, 0, InteractionKind::Directed);

        assert!(!classified.has_node());
        assert_eq!(
            classified.require_node(),
            Err(DropReason::UnsupportedParticipantShape { groups: 2, lines: 0 })
        );
    }
}
