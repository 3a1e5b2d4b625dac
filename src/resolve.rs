//! Pathway-wide resolution of lines and complex groups.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, info};

use crate::anchor::AnchorIndex;
use crate::classify::Classifier;
use crate::complex::resolve_complex;
use crate::identity::{IriScheme, ParticipantCache};
use crate::interaction::{Participant, ResolvedComplex, ResolvedInteraction};
use crate::merge;
use crate::model::{Element, Group, Line, Pathway};
use crate::reconcile::reconcile;
use crate::report::{Diagnostic, DropReason, Report};

/// Everything resolved from one pathway, ready for emission.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Keyed by primary line id, in resolution order.
    pub interactions: IndexMap<String, ResolvedInteraction>,
    /// Keyed by group id.
    pub complexes: IndexMap<String, ResolvedComplex>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn interaction(&self, id: &str) -> Option<&ResolvedInteraction> {
        self.interactions.get(id)
    }

    pub fn complex(&self, group_id: &str) -> Option<&ResolvedComplex> {
        self.complexes.get(group_id)
    }
}

/// Stateful resolver for one pathway conversion.
///
/// Remembers which lines were already merged so no line ends up in two interactions,
/// however often it is handed to [`Resolver::resolve_line`].
pub struct Resolver<'p> {
    pathway: &'p Pathway,
    cache: &'p ParticipantCache,
    scheme: &'p IriScheme,
    index: AnchorIndex<'p>,
    visited: HashSet<&'p str>,
    /// Primary line of the merge every visited line went into, dropped merges included.
    merged_into: HashMap<&'p str, &'p str>,
    interactions: IndexMap<String, ResolvedInteraction>,
    complexes: IndexMap<String, ResolvedComplex>,
    report: Report,
}

impl<'p> Resolver<'p> {
    pub fn new(pathway: &'p Pathway, cache: &'p ParticipantCache, scheme: &'p IriScheme) -> Self {
        Self {
            pathway,
            cache,
            scheme,
            index: AnchorIndex::build(pathway),
            visited: HashSet::new(),
            merged_into: HashMap::new(),
            interactions: IndexMap::new(),
            complexes: IndexMap::new(),
            report: Report::default(),
        }
    }

    /// Resolve the interaction `line` belongs to, unless it was handled already.
    ///
    /// When `line` continues another line through an anchor, the merge starts from
    /// that line instead. Returns the number of interactions added.
    pub fn resolve_line(&mut self, line: &'p Line) -> usize {
        let before = self.interactions.len();
        while !self.visited.contains(line.id.as_str()) {
            let primary = merge::primary_for(&self.index, line, &self.visited);
            self.resolve_primary(primary);
        }
        self.interactions.len() - before
    }

    fn resolve_primary(&mut self, primary: &'p Line) {
        self.visited.insert(&primary.id);
        self.merged_into.insert(&primary.id, &primary.id);

        if let Err(reason) = merge::check_references(self.pathway, primary) {
            self.report.drop_element(&primary.id, reason);
            return;
        }

        let merged = merge::merge_lines(&self.index, primary, &self.visited);
        for &line in &merged.merged {
            self.visited.insert(&line.id);
            self.merged_into.insert(&line.id, &primary.id);
        }
        debug!(
            line_id = primary.id,
            merged = merged.merged.len(),
            regulatory = merged.regulatory.len();
            "Merged lines"
        );

        let kind = match reconcile(&merged.merged) {
            Ok(kind) => kind,
            Err(reason) => {
                self.report.drop_element(&primary.id, reason);
                return;
            }
        };

        let classified = Classifier::new(self.pathway, self.cache, &self.index).classify(&merged, &kind, &mut self.report);
        if let Err(reason) = classified.require_node() {
            self.report.drop_element(&primary.id, reason);
            return;
        }

        let mut interaction = ResolvedInteraction::new(primary.id.clone(), kind);
        interaction.lines = merged.merged.iter().map(|line| line.id.clone()).collect();
        interaction.regulators = merged.regulatory.iter().map(|line| line.id.clone()).collect();
        interaction.sources = classified.sources;
        interaction.targets = classified.targets;
        interaction.others = classified.others;
        self.interactions.insert(interaction.id.clone(), interaction);
    }

    /// Resolve every line in pathway order.
    pub fn resolve_lines(&mut self) {
        let pathway = self.pathway;
        for line in pathway.lines() {
            self.resolve_line(line);
        }
    }

    /// Lines named by an interaction participant that no merge has covered yet.
    fn unmerged_participant_lines(&self) -> Vec<&'p Line> {
        let pathway = self.pathway;
        self.interactions
            .values()
            .flat_map(ResolvedInteraction::participants)
            .filter_map(|participant| match participant {
                Participant::Interaction { element_id } => Some(element_id.as_str()),
                _ => None,
            })
            .filter(|id| !self.visited.contains(*id))
            .filter_map(|id| match pathway.lookup(id) {
                Some(Element::Line(line)) => Some(line),
                _ => None,
            })
            .collect()
    }

    /// Rename every interaction participant from the line it was drawn to, to the
    /// interaction that line was merged into.
    ///
    /// A participant whose line ended up in no resolved interaction is dropped.
    fn settle_interaction_participants(&mut self) {
        loop {
            let pending = self.unmerged_participant_lines();
            if pending.is_empty() {
                break;
            }
            for line in pending {
                self.resolve_line(line);
            }
        }

        let resolved: HashSet<String> = self.interactions.keys().cloned().collect();
        let merged_into = &self.merged_into;
        let mut unresolved: Vec<(String, String)> = Vec::new();
        for interaction in self.interactions.values_mut() {
            let id = interaction.id.clone();
            for set in [
                &mut interaction.sources,
                &mut interaction.targets,
                &mut interaction.others,
            ] {
                *set = std::mem::take(set)
                    .into_iter()
                    .filter_map(|participant| match participant {
                        Participant::Interaction { element_id } => {
                            let primary = merged_into
                                .get(element_id.as_str())
                                .map_or_else(|| element_id.clone(), |primary| primary.to_string());
                            if resolved.contains(&primary) {
                                Some(Participant::Interaction { element_id: primary })
                            } else {
                                unresolved.push((id.clone(), element_id));
                                None
                            }
                        }
                        other => Some(other),
                    })
                    .collect();
            }
        }
        for (interaction_id, line) in unresolved {
            self.report
                .drop_participant(&interaction_id, DropReason::UnresolvedInteraction { line });
        }
    }

    pub fn resolve_group(&mut self, group: &'p Group) {
        if self.complexes.contains_key(&group.id) {
            return;
        }
        match resolve_complex(self.pathway, self.cache, self.scheme, group) {
            Ok(Some(complex)) => {
                self.complexes.insert(complex.group_id.clone(), complex);
            }
            Ok(None) => debug!(group_id = group.id; "Group is not a complex"),
            Err(reason) => self.report.drop_element(&group.id, reason),
        }
    }

    pub fn resolve_groups(&mut self) {
        let pathway = self.pathway;
        for group in pathway.groups() {
            self.resolve_group(group);
        }
    }

    /// Settle cross-interaction participants and hand over everything resolved so far.
    pub fn finish(mut self) -> Resolution {
        self.settle_interaction_participants();
        info!(
            interactions = self.interactions.len(),
            complexes = self.complexes.len(),
            dropped = self.report.diagnostics().len();
            "Resolved pathway"
        );
        Resolution {
            interactions: self.interactions,
            complexes: self.complexes,
            diagnostics: self.report.into_diagnostics(),
        }
    }
}

/// Resolve all lines, then all complex groups, of a pathway whose nodes are already cached.
pub fn resolve_pathway(pathway: &Pathway, cache: &ParticipantCache, scheme: &IriScheme) -> Resolution {
    let mut resolver = Resolver::new(pathway, cache, scheme);
    resolver.resolve_lines();
    resolver.resolve_groups();
    resolver.finish()
}
