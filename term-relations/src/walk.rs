//! `walko` relates two term graphs node by node.
use crate::apply::applyo_with;
use crate::config::Relation;
use crate::config::WalkConfig;
use logic_stream::and;
use logic_stream::or;
use logic_stream::Goal;
use logic_stream::Term;
use std::rc::Rc;

/// Relates `graph_in` and `graph_out` at every level: either
/// `node_relation` holds between them directly, or both are compound
/// and their subterms are related by `walko` itself, aggregated with
/// `config.policy`.
///
/// Without an operator relation, a compound term is walked as one
/// flat sequence, operator included.  With one, the operators must
/// satisfy it and only the operands are walked.
#[must_use]
pub fn walko<R>(
    node_relation: R,
    graph_in: impl Into<Term>,
    graph_out: impl Into<Term>,
    config: WalkConfig,
) -> Goal
where
    R: Fn(Term, Term) -> Goal + 'static,
{
    walk(
        Rc::new(node_relation),
        graph_in.into(),
        graph_out.into(),
        Rc::new(config),
    )
}

fn walk(node_relation: Relation, graph_in: Term, graph_out: Term, config: Rc<WalkConfig>) -> Goal {
    Goal::dynamic(move |state| {
        let graph_in = state.reify(&graph_in);
        let graph_out = state.reify(&graph_out);

        let recurse: Relation = {
            let node_relation = node_relation.clone();
            let config = config.clone();

            Rc::new(move |sub_in: Term, sub_out: Term| {
                walk(node_relation.clone(), sub_in, sub_out, config.clone())
            })
        };
        let map_config = config.map_config();

        let structural = match &config.operator_relation {
            Some(operator_relation) => {
                let (rator_in, rands_in) = (Term::var("rator_in"), Term::var("rands_in"));
                let (rator_out, rands_out) = (Term::var("rator_out"), Term::var("rands_out"));

                and(vec![
                    applyo_with(
                        config.protocol.clone(),
                        rator_in.clone(),
                        rands_in.clone(),
                        graph_in.clone(),
                    ),
                    applyo_with(
                        config.protocol.clone(),
                        rator_out.clone(),
                        rands_out.clone(),
                        graph_out.clone(),
                    ),
                    operator_relation(rator_in, rator_out),
                    config.policy.map(recurse, rands_in, rands_out, map_config),
                ])
            }
            None => config
                .policy
                .map(recurse, graph_in.clone(), graph_out.clone(), map_config),
        };

        or(vec![
            vec![node_relation(graph_in, graph_out)],
            vec![structural],
        ])
    })
}

#[cfg(test)]
fn add(a: Term, b: Term) -> Term {
    Term::expr(Term::sym("add"), vec![a, b])
}

#[cfg(test)]
fn mul(a: Term, b: Term) -> Term {
    Term::expr(Term::sym("mul"), vec![a, b])
}

#[cfg(test)]
fn same(a: Term, b: Term) -> Goal {
    logic_stream::eq(a, b)
}

#[cfg(test)]
fn flip_negative(a: Term, b: Term) -> Goal {
    use logic_stream::eq;
    use logic_stream::fail;

    Goal::dynamic(move |state| match state.reify(&a) {
        Term::Int(value) if value < 0 => eq(b.clone(), -value),
        _ => fail(),
    })
}

#[cfg(test)]
fn graph() -> Term {
    add(Term::int(1), mul(Term::int(-2), Term::int(3)))
}

#[test]
fn test_walk_identity() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let found = run_all(&q, &walko(same, graph(), graph(), WalkConfig::default()));

    assert!(!found.is_empty());
    assert!(found.iter().all(|term| *term == q));
}

#[test]
fn test_walk_rewrites_single_leaf() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let found = run_all(&q, &walko(flip_negative, graph(), q.clone(), WalkConfig::default()));

    assert_eq!(found, [add(Term::int(1), mul(Term::int(2), Term::int(3)))]);
}

#[test]
fn test_walk_rejects_extra_change() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let candidate = add(Term::int(5), mul(Term::int(2), Term::int(3)));

    let found = run_all(&q, &walko(flip_negative, graph(), candidate, WalkConfig::default()));
    assert!(found.is_empty());
}

#[test]
fn test_walk_operator_relation() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let config = WalkConfig::default().with_operator_relation(same);

    let found = run_all(&q, &walko(flip_negative, graph(), q.clone(), config));
    assert_eq!(found, [add(Term::int(1), mul(Term::int(2), Term::int(3)))]);
}

#[test]
fn test_walk_operator_relation_on_lists() {
    use logic_stream::run_all;
    use logic_stream::ExprProtocol;

    let q = Term::var("q");
    let list = Term::list(vec![Term::sym("f"), Term::int(-1)]);

    let config = WalkConfig::default().with_operator_relation(same);
    let found = run_all(&q, &walko(flip_negative, list.clone(), q.clone(), config));
    assert_eq!(found, [Term::list(vec![Term::sym("f"), Term::int(1)])]);

    let config = WalkConfig::default()
        .with_operator_relation(same)
        .with_protocol(ExprProtocol);
    assert!(run_all(&q, &walko(flip_negative, list, q.clone(), config)).is_empty());
}

#[test]
fn test_walk_all_policy() {
    use crate::config::MapPolicy;
    use logic_stream::eq;
    use logic_stream::fail;
    use logic_stream::run_all;

    fn positive_leaf(a: Term, b: Term) -> Goal {
        Goal::dynamic(move |state| match state.reify(&a) {
            Term::Int(value) if value > 0 => eq(b.clone(), a.clone()),
            _ => fail(),
        })
    }

    let q = Term::var("q");
    let config = || {
        WalkConfig::default()
            .with_policy(MapPolicy::All)
            .with_operator_relation(same)
    };

    let positive = add(Term::int(1), mul(Term::int(2), Term::int(3)));
    let found = run_all(&q, &walko(positive_leaf, positive.clone(), q.clone(), config()));
    assert_eq!(found, [positive]);

    let found = run_all(&q, &walko(positive_leaf, graph(), q.clone(), config()));
    assert!(found.is_empty());
}

#[test]
fn test_walk_with_reduction() {
    use crate::reduce::reduceo;
    use logic_stream::eq;
    use logic_stream::run_all;

    fn fold_double(input: Term, output: Term) -> Goal {
        let x = Term::var("x");

        and(vec![
            eq(input, add(x.clone(), x.clone())),
            eq(output, mul(Term::int(2), x)),
        ])
    }

    let q = Term::var("q");
    let three = add(Term::int(3), Term::int(3));
    let four = add(Term::int(4), Term::int(4));
    let start = Term::expr(Term::sym("f"), vec![three, four.clone()]);

    let goal = walko(
        |a, b| reduceo(fold_double, a, b),
        start,
        q.clone(),
        WalkConfig::default(),
    );
    let found = run_all(&q, &goal);

    let both = Term::expr(
        Term::sym("f"),
        vec![mul(Term::int(2), Term::int(3)), mul(Term::int(2), Term::int(4))],
    );
    assert_eq!(found.len(), 3);
    assert!(found.contains(&both));
    assert!(found.contains(&Term::expr(
        Term::sym("f"),
        vec![mul(Term::int(2), Term::int(3)), four],
    )));
}

#[test]
fn test_walk_leaf() {
    use logic_stream::run_all;

    let q = Term::var("q");

    let found = run_all(&q, &walko(flip_negative, -4, q.clone(), WalkConfig::default()));
    assert_eq!(found, [Term::int(4)]);

    let found = run_all(&q, &walko(flip_negative, 4, q.clone(), WalkConfig::default()));
    assert!(found.is_empty());
}
