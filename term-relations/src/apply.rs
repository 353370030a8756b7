//! `applyo` relates a compound term to its operator and operands.
use logic_stream::and;
use logic_stream::conso;
use logic_stream::eq;
use logic_stream::fail;
use logic_stream::Decompose;
use logic_stream::Goal;
use logic_stream::SequenceProtocol;
use logic_stream::Term;
use std::rc::Rc;

/// `whole` is the compound term `operator(operands...)`.  Any
/// non-empty sequence is compound (`SequenceProtocol`), whatever its
/// terminator; use `applyo_with` to restrict that.
#[must_use]
pub fn applyo(
    operator: impl Into<Term>,
    operands: impl Into<Term>,
    whole: impl Into<Term>,
) -> Goal {
    applyo_with(Rc::new(SequenceProtocol), operator, operands, whole)
}

/// `whole` is the compound term built from `operator` and `operands`
/// under `protocol`.
///
/// The arguments are examined once they are reified:
///  - a bound `whole` is decomposed, and its parts unified with
///    `operator` and `operands`;
///  - when `whole` is unbound, but `operator` or `operands` is too,
///    the three are related structurally, as `whole = cons(operator,
///    operands)`;
///  - otherwise, `whole` is unified with the constructed term.
///
/// Terms the protocol rejects make the goal fail; they never surface
/// as errors.
#[must_use]
pub fn applyo_with(
    protocol: Rc<dyn Decompose>,
    operator: impl Into<Term>,
    operands: impl Into<Term>,
    whole: impl Into<Term>,
) -> Goal {
    let (operator, operands, whole) = (operator.into(), operands.into(), whole.into());

    Goal::dynamic(move |state| {
        let operator = state.reify(&operator);
        let operands = state.reify(&operands);
        let whole = state.reify(&whole);

        if !whole.is_var() {
            let parts = protocol
                .operator(&whole)
                .and_then(|rator| Ok((rator, protocol.operands(&whole)?)));

            match parts {
                Ok((rator, rands)) => and(vec![eq(operator, rator), eq(operands, rands)]),
                Err(err) => {
                    tracing::trace!(%err, "applyo: cannot decompose");
                    fail()
                }
            }
        } else if operator.is_var() || operands.is_var() {
            conso(operator, operands, whole)
        } else {
            match protocol.construct(&operator, &operands) {
                Ok(constructed) => eq(whole, constructed),
                Err(err) => {
                    tracing::trace!(%err, "applyo: cannot construct");
                    fail()
                }
            }
        }
    })
}

#[cfg(test)]
fn f_of_1_2() -> Term {
    Term::expr(Term::sym("f"), vec![Term::int(1), Term::int(2)])
}

#[test]
fn test_decompose_once() {
    use logic_stream::run_all;
    use logic_stream::SeqKind;

    let (rator, rands) = (Term::var("rator"), Term::var("rands"));
    let pair = Term::tuple(vec![rator.clone(), rands.clone()]);

    let found = run_all(&pair, &applyo(rator, rands, f_of_1_2()));
    assert_eq!(
        found,
        [Term::tuple(vec![
            Term::sym("f"),
            Term::sequence(SeqKind::Expr, vec![Term::int(1), Term::int(2)]),
        ])]
    );
}

#[test]
fn test_decompose_list() {
    use logic_stream::run_all;

    let (rator, rands) = (Term::var("rator"), Term::var("rands"));
    let pair = Term::tuple(vec![rator.clone(), rands.clone()]);
    let list = Term::list(vec![Term::sym("f"), Term::int(1), Term::int(2)]);

    let found = run_all(&pair, &applyo(rator, rands, list));
    assert_eq!(
        found,
        [Term::tuple(vec![
            Term::sym("f"),
            Term::list(vec![Term::int(1), Term::int(2)]),
        ])]
    );
}

#[test]
fn test_construct() {
    use logic_stream::run_all;
    use logic_stream::SeqKind;

    let q = Term::var("q");
    let rands = Term::sequence(SeqKind::Expr, vec![Term::int(1), Term::int(2)]);

    assert_eq!(run_all(&q, &applyo("f", rands, q.clone())), [f_of_1_2()]);
}

#[test]
fn test_atom_fails() {
    use logic_stream::run_all;
    use logic_stream::SeqKind;

    let q = Term::var("q");

    assert!(run_all(&q, &applyo(Term::var("rator"), q.clone(), 5)).is_empty());
    assert!(run_all(&q, &applyo("f", q.clone(), Term::nil(SeqKind::List))).is_empty());
    assert!(run_all(&q, &applyo("f", Term::int(1), q.clone())).is_empty());
}

#[test]
fn test_all_unbound() {
    use logic_stream::run_all;

    let (rator, rands, whole) = (Term::var("rator"), Term::var("rands"), Term::var("whole"));

    let found = run_all(&whole, &applyo(rator.clone(), rands.clone(), whole.clone()));
    assert_eq!(found, [Term::cons(rator, rands)]);
}

#[test]
fn test_partially_bound() {
    use logic_stream::run_all;
    use logic_stream::SeqKind;

    let (rands, whole) = (Term::var("rands"), Term::var("whole"));
    let goal = and(vec![
        applyo("f", rands.clone(), whole.clone()),
        eq(rands, Term::sequence(SeqKind::Expr, vec![Term::int(1), Term::int(2)])),
    ]);

    assert_eq!(run_all(&whole, &goal), [f_of_1_2()]);
}

#[test]
fn test_protocol_choice() {
    use logic_stream::run_all;
    use logic_stream::ExprProtocol;

    let q = Term::var("q");
    let operands = Term::list(vec![Term::int(1)]);

    let goal = applyo("f", operands.clone(), q.clone());
    assert_eq!(
        run_all(&q, &goal),
        [Term::list(vec![Term::sym("f"), Term::int(1)])]
    );

    // Only expressions are compound under `ExprProtocol`.
    let goal = applyo_with(Rc::new(ExprProtocol), "f", operands, q.clone());
    assert!(run_all(&q, &goal).is_empty());

    let goal = applyo_with(
        Rc::new(ExprProtocol),
        Term::var("rator"),
        Term::var("rands"),
        Term::list(vec![Term::sym("f"), Term::int(1)]),
    );
    assert!(run_all(&q, &goal).is_empty());
}
