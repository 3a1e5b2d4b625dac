use indexmap::IndexSet;

use crate::interaction::InteractionKind;
use crate::model::{ArrowHead, Line};
use crate::report::DropReason;

/// Decide the overall kind of a merged line set from its non-undirected arrowheads.
///
/// No such arrowhead means an undirected interaction; more than one distinct kind
/// cannot be reconciled and is reported as ambiguous.
pub fn reconcile(lines: &[&Line]) -> Result<InteractionKind, DropReason> {
    let kinds: IndexSet<&ArrowHead> = lines
        .iter()
        .flat_map(|line| [&line.start_arrow, &line.end_arrow])
        .filter(|arrow| !arrow.is_undirected())
        .collect();

    match kinds.len() {
        0 => Ok(InteractionKind::Undirected),
        1 => Ok(InteractionKind::from_arrow(kinds[0])),
        _ => Err(DropReason::AmbiguousInteractionType {
            kinds: kinds.into_iter().cloned().collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn line(id: &str, start: ArrowHead, end: ArrowHead) -> Line {
        Line::new(id).from_ref("a", start).to_ref("b", end)
    }

    #[test]
    fn all_undirected_is_undirected() {
        let l1 = line("l1", ArrowHead::Undirected, ArrowHead::Undirected);
        let l2 = line("l2", ArrowHead::Undirected, ArrowHead::Undirected);
        assert_eq!(reconcile(&[&l1, &l2]), Ok(InteractionKind::Undirected));
    }

    #[test]
    fn single_kind_wins_wherever_it_appears() {
        let l1 = line("l1", ArrowHead::Catalysis, ArrowHead::Undirected);
        let l2 = line("l2", ArrowHead::Undirected, ArrowHead::Catalysis);
        assert_eq!(reconcile(&[&l1, &l2]), Ok(InteractionKind::Catalysis));
    }

    #[test]
    fn other_arrowheads_reconcile_to_unsupported() {
        let l1 = line("l1", ArrowHead::Undirected, ArrowHead::Inhibition);
        assert_eq!(
            reconcile(&[&l1]),
            Ok(InteractionKind::Unsupported(ArrowHead::Inhibition))
        );
    }

    #[test]
    fn two_kinds_are_ambiguous() {
        let l1 = line("l1", ArrowHead::Undirected, ArrowHead::Directed);
        let l2 = line("l2", ArrowHead::Undirected, ArrowHead::Catalysis);
        assert_eq!(
            reconcile(&[&l1, &l2]),
            Err(DropReason::AmbiguousInteractionType {
                kinds: vec![ArrowHead::Directed, ArrowHead::Catalysis]
            })
        );
    }

    fn arrow_strategy() -> impl Strategy<Value = ArrowHead> {
        prop::sample::select(vec![
            ArrowHead::Undirected,
            ArrowHead::Directed,
            ArrowHead::Catalysis,
            ArrowHead::Conversion,
            ArrowHead::Inhibition,
        ])
    }

    /// Only the number of distinct non-undirected arrowheads decides the outcome.
    fn check_outcome_follows_distinct_arrowheads(arrows: Vec<(ArrowHead, ArrowHead)>) -> Result<(), TestCaseError> {
        let lines: Vec<Line> = arrows
            .iter()
            .enumerate()
            .map(|(i, (start, end))| line(&format!("l{i}"), start.clone(), end.clone()))
            .collect();
        let refs: Vec<&Line> = lines.iter().collect();
        let distinct: HashSet<&ArrowHead> = arrows
            .iter()
            .flat_map(|(start, end)| [start, end])
            .filter(|arrow| !arrow.is_undirected())
            .collect();

        match (reconcile(&refs), distinct.len()) {
            (Ok(InteractionKind::Undirected), 0) => {}
            (Ok(kind), 1) => {
                let arrow = distinct.into_iter().next().unwrap();
                prop_assert_eq!(kind, InteractionKind::from_arrow(arrow));
            }
            (Err(DropReason::AmbiguousInteractionType { kinds }), count) => {
                prop_assert!(count > 1);
                prop_assert_eq!(kinds.len(), count);
            }
            (outcome, count) => {
                prop_assert!(false, "{count} distinct arrowhead(s) gave {outcome:?}");
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn outcome_follows_distinct_arrowheads(
            arrows in prop::collection::vec((arrow_strategy(), arrow_strategy()), 1..6)
        ) {
            check_outcome_follows_distinct_arrowheads(arrows)?;
        }
    }
}
