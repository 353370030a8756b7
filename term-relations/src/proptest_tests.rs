//! Property-based tests for the sequence and graph relations.

use crate::applyo;
use crate::eq_length;
use crate::map_anyo;
use crate::mapo;
use crate::walko;
use crate::MapConfig;
use crate::WalkConfig;
use logic_stream::eq;
use logic_stream::fail;
use logic_stream::run;
use logic_stream::run_all;
use logic_stream::Goal;
use logic_stream::SeqKind;
use logic_stream::Term;
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = SeqKind> {
    prop_oneof![Just(SeqKind::List), Just(SeqKind::Tuple), Just(SeqKind::Expr)]
}

fn ints(values: &[i64]) -> Vec<Term> {
    values.iter().copied().map(Term::int).collect()
}

fn same(a: Term, b: Term) -> Goal {
    eq(a, b)
}

fn never(_: Term, _: Term) -> Goal {
    fail()
}

fn negate(a: Term, b: Term) -> Goal {
    Goal::dynamic(move |state| match state.reify(&a) {
        Term::Int(value) => eq(b.clone(), -value),
        _ => fail(),
    })
}

/// Arithmetic over small positive leaves.
fn arb_graph() -> impl Strategy<Value = Term> {
    let leaf = (1..100i64).prop_map(Term::int);

    leaf.prop_recursive(3, 16, 3, |inner| {
        (
            prop_oneof![Just("add"), Just("mul"), Just("neg")],
            proptest::collection::vec(inner, 1..=3),
        )
            .prop_map(|(op, operands)| Term::expr(Term::sym(op), operands))
    })
}

proptest! {
    #[test]
    fn eq_length_matches_lengths(
        left in proptest::collection::vec(any::<i8>(), 0..6),
        right in proptest::collection::vec(any::<i8>(), 0..6),
        kind in arb_kind(),
    ) {
        let q = Term::var("q");
        let a = Term::sequence(kind, left.iter().map(|&v| Term::int(v.into())).collect::<Vec<_>>());
        let b = Term::sequence(kind, right.iter().map(|&v| Term::int(v.into())).collect::<Vec<_>>());

        let found = run_all(&q, &eq_length(a, b, SeqKind::List));
        prop_assert_eq!(found.len(), usize::from(left.len() == right.len()));
    }

    #[test]
    fn mapo_maps_every_element(values in proptest::collection::vec(-50..50i64, 0..8)) {
        let q = Term::var("q");
        let goal = mapo(negate, Term::list(ints(&values)), q.clone(), MapConfig::all());

        let negated: Vec<i64> = values.iter().map(|v| -v).collect();
        prop_assert_eq!(run_all(&q, &goal), vec![Term::list(ints(&negated))]);
    }

    #[test]
    fn map_anyo_counts_nonempty_subsets(values in proptest::collection::vec(1..50i64, 0..6)) {
        let q = Term::var("q");
        let goal = map_anyo(negate, Term::list(ints(&values)), q.clone(), MapConfig::any());

        // Each position is either negated or kept, but not all kept.
        let expected = (1usize << values.len()) - 1;
        prop_assert_eq!(run_all(&q, &goal).len(), expected);
    }

    #[test]
    fn map_anyo_never_relation_fails(values in proptest::collection::vec(any::<i8>(), 0..6)) {
        let q = Term::var("q");
        let seq = Term::list(values.iter().map(|&v| Term::int(v.into())).collect::<Vec<_>>());

        let goal = map_anyo(never, seq.clone(), seq, MapConfig::any());
        prop_assert!(run_all(&q, &goal).is_empty());
    }

    #[test]
    fn applyo_round_trips(graph in arb_graph()) {
        let (rator, rands, whole) = (Term::var("rator"), Term::var("rands"), Term::var("whole"));
        let parts = Term::tuple(vec![rator.clone(), rands.clone()]);

        let found = run_all(&parts, &applyo(rator, rands, graph.clone()));
        prop_assert_eq!(found.len(), usize::from(graph.is_cons()));

        if let [decomposed] = found.as_slice() {
            let items = decomposed.to_vec().unwrap_or_default();
            prop_assert_eq!(items.len(), 2);

            let rebuilt = run_all(&whole, &applyo(items[0].clone(), items[1].clone(), whole.clone()));
            prop_assert_eq!(rebuilt, vec![graph]);
        }
    }

    #[test]
    fn walko_identity_terminates(graph in arb_graph()) {
        let q = Term::var("q");
        let found = run(64, &q, &walko(same, graph.clone(), q.clone(), WalkConfig::default()));

        prop_assert!(!found.is_empty());
        prop_assert!(found.iter().all(|term| *term == graph));
    }
}
