//! Property-based tests for unification and reification.

use crate::SeqKind;
use crate::State;
use crate::Term;
use crate::Var;
use proptest::prelude::*;

/// Term description, resolved against a fixed pool of variables.
#[derive(Clone, Debug)]
enum TermDesc {
    Var(u8),
    Int(i8),
    Sym(u8),
    Seq(u8, Vec<TermDesc>),
}

fn arb_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    let leaf = prop_oneof![
        (0..3u8).prop_map(TermDesc::Var),
        any::<i8>().prop_map(TermDesc::Int),
        (0..3u8).prop_map(TermDesc::Sym),
    ];

    if max_depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            3 => leaf,
            2 => (0..3u8, proptest::collection::vec(arb_term_desc(max_depth - 1), 0..=3))
                .prop_map(|(kind, items)| TermDesc::Seq(kind, items)),
        ]
        .boxed()
    }
}

fn build(desc: &TermDesc, pool: &[Var]) -> Term {
    match desc {
        TermDesc::Var(i) => Term::Var(pool[*i as usize]),
        TermDesc::Int(i) => Term::int((*i).into()),
        TermDesc::Sym(i) => Term::sym(&format!("s{}", i)),
        TermDesc::Seq(kind, items) => {
            let kind = match kind {
                0 => SeqKind::List,
                1 => SeqKind::Tuple,
                _ => SeqKind::Expr,
            };
            Term::sequence(kind, items.iter().map(|item| build(item, pool)).collect::<Vec<_>>())
        }
    }
}

fn pool() -> Vec<Var> {
    vec![Var::fresh("a"), Var::fresh("b"), Var::fresh("c")]
}

proptest! {
    #[test]
    fn unify_is_symmetric(lhs in arb_term_desc(3), rhs in arb_term_desc(3)) {
        let vars = pool();
        let (lhs, rhs) = (build(&lhs, &vars), build(&rhs, &vars));

        let forward = State::new().unify(&lhs, &rhs);
        let backward = State::new().unify(&rhs, &lhs);
        prop_assert_eq!(forward.is_some(), backward.is_some());
    }

    #[test]
    fn unifier_makes_terms_equal(lhs in arb_term_desc(3), rhs in arb_term_desc(3)) {
        let vars = pool();
        let (lhs, rhs) = (build(&lhs, &vars), build(&rhs, &vars));

        if let Some(state) = State::new().unify(&lhs, &rhs) {
            prop_assert_eq!(state.reify(&lhs), state.reify(&rhs));
        }
    }

    #[test]
    fn term_unifies_with_itself(desc in arb_term_desc(3)) {
        let vars = pool();
        let term = build(&desc, &vars);

        let state = State::new().unify(&term, &term);
        prop_assert!(state.is_some());
        prop_assert!(state.map(|s| s.is_empty()).unwrap_or(false));
    }

    #[test]
    fn reify_is_idempotent(lhs in arb_term_desc(3), rhs in arb_term_desc(3)) {
        let vars = pool();
        let (lhs, rhs) = (build(&lhs, &vars), build(&rhs, &vars));

        if let Some(state) = State::new().unify(&lhs, &rhs) {
            let once = state.reify(&lhs);
            prop_assert_eq!(state.reify(&once), once);
        }
    }
}
