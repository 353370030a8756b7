//! `reduceo` relates a term to the terms reachable from it through
//! one or more applications of a relation.
use crate::config::Relation;
use logic_stream::and;
use logic_stream::defer;
use logic_stream::eq;
use logic_stream::or;
use logic_stream::or_ordered;
use logic_stream::Goal;
use logic_stream::Term;
use std::rc::Rc;

/// `output` is reached from `input` by applying `relation` one or
/// more times.
///
/// With a bound `input` (reduction), results come deepest first: the
/// term where the chain stops is produced before the intermediate
/// terms that led to it.  A step that leaves the term unchanged ends
/// the chain, so relations with fixed points terminate.
///
/// With an unbound `input` (expansion), pre-images are enumerated
/// breadth-first, nearest first.  Expansion is generally unbounded:
/// take finitely many results.
#[must_use]
pub fn reduceo<R>(relation: R, input: impl Into<Term>, output: impl Into<Term>) -> Goal
where
    R: Fn(Term, Term) -> Goal + 'static,
{
    reduce(Rc::new(relation), input.into(), output.into())
}

fn reduce(relation: Relation, input: Term, output: Term) -> Goal {
    Goal::dynamic(move |state| {
        let input = state.reify(&input);
        let output = state.reify(&output);
        let reduced = Term::var("reduced");

        let step = relation(input.clone(), reduced.clone());
        let stop = eq(reduced.clone(), output.clone());
        let again = {
            let relation = relation.clone();
            let reduced = reduced.clone();

            defer(move || reduce(relation.clone(), reduced.clone(), output.clone()))
        };

        if input.is_var() {
            // Shortest chains first, so that the search keeps
            // producing pre-images.
            return and(vec![or(vec![vec![stop], vec![again]]), step]);
        }

        let stop_or_continue = Goal::dynamic(move |state| {
            if state.reify(&reduced) == input {
                tracing::trace!(term = %input, "reduceo: fixed point");
                stop.clone()
            } else {
                or_ordered(vec![vec![again.clone()], vec![stop.clone()]])
            }
        });

        and(vec![step, stop_or_continue])
    })
}

#[cfg(test)]
fn halve_if_even(n: Term, m: Term) -> Goal {
    use logic_stream::fail;

    Goal::dynamic(move |state| match state.reify(&n) {
        Term::Int(value) if value % 2 == 0 => eq(m.clone(), value / 2),
        Term::Int(_) => eq(m.clone(), n.clone()),
        _ => fail(),
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

/// `add(x, x)` rewrites to `mul(2, x)`.
#[cfg(test)]
fn fold_double(input: Term, output: Term) -> Goal {
    let x = Term::var("x");

    and(vec![
        eq(input, add(x.clone(), x.clone())),
        eq(output, mul(Term::int(2), x)),
    ])
}

#[test]
fn test_identity_terminates() {
    use logic_stream::run_all;

    let q = Term::var("q");

    assert_eq!(
        run_all(&q, &reduceo(|a: Term, b: Term| eq(a, b), 5, q.clone())),
        [Term::int(5)]
    );
}

#[test]
fn test_deepest_first() {
    use logic_stream::run;
    use logic_stream::run_all;

    let q = Term::var("q");
    let goal = reduceo(halve_if_even, 8, q.clone());

    assert_eq!(run(1, &q, &goal), [Term::int(1)]);
    assert_eq!(
        run_all(&q, &goal),
        [Term::int(1), Term::int(1), Term::int(2), Term::int(4)]
    );
}

#[test]
fn test_long_chain() {
    use logic_stream::fail;
    use logic_stream::run;

    // n steps to n - 1, and 0 is a fixed point.
    fn countdown(n: Term, m: Term) -> Goal {
        Goal::dynamic(move |state| match state.reify(&n) {
            Term::Int(0) => eq(m.clone(), 0),
            Term::Int(value) if value > 0 => eq(m.clone(), value - 1),
            _ => fail(),
        })
    }

    let q = Term::var("q");
    let goal = reduceo(countdown, 100_000, q.clone());

    assert_eq!(run(1, &q, &goal), [Term::int(0)]);
    assert_eq!(run(3, &q, &goal), [Term::int(0), Term::int(0), Term::int(1)]);
}

#[test]
fn test_no_step() {
    use logic_stream::run_all;

    let q = Term::var("q");

    assert!(run_all(&q, &reduceo(fold_double, 3, q.clone())).is_empty());
}

#[test]
fn test_rewrite_forward() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let three = add(Term::int(3), Term::int(3));
    let goal = reduceo(fold_double, add(three.clone(), three.clone()), q.clone());

    assert_eq!(run_all(&q, &goal), [mul(Term::int(2), three)]);
}

#[test]
fn test_expand_backward() {
    use logic_stream::run;

    let q = Term::var("q");
    let goal = reduceo(fold_double, q.clone(), mul(Term::int(2), Term::int(5)));

    assert_eq!(run(1, &q, &goal), [add(Term::int(5), Term::int(5))]);
}

#[test]
fn test_expand_nearest_first() {
    use logic_stream::run;

    /// `s(x)` rewrites to `x`.
    fn peel(input: Term, output: Term) -> Goal {
        eq(input, succ(output))
    }

    fn succ(term: Term) -> Term {
        Term::expr(Term::sym("s"), vec![term])
    }

    let q = Term::var("q");
    let zero = Term::sym("z");
    let goal = reduceo(peel, q.clone(), zero.clone());

    assert_eq!(
        run(3, &q, &goal),
        [
            succ(zero.clone()),
            succ(succ(zero.clone())),
            succ(succ(succ(zero))),
        ]
    );
}
