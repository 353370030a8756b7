//! The primitive sequence relations: `conso` relates a sequence to
//! its head and tail, `nullo` relates terms to an empty sequence.
//!
//! The kind of terminator a `nullo` goal unifies with is inferred
//! from its arguments when one of them is already a terminator, and
//! otherwise taken from the caller's default.  This is what lets two
//! sequences of unknown shape end up with matching terminators.
use crate::eq;
use crate::fail;
use crate::Goal;
use crate::SeqKind;
use crate::Term;

/// `whole == cons(head, tail)`.
#[must_use]
pub fn conso(head: impl Into<Term>, tail: impl Into<Term>, whole: impl Into<Term>) -> Goal {
    eq(Term::cons(head.into(), tail.into()), whole)
}

/// All of `terms` are the same empty sequence.  The terminator comes
/// from the first argument that is already bound to one, or is
/// `default` when all arguments are unbound.
///
/// Fails if an argument is bound to anything but a variable or a
/// terminator, or if the arguments disagree on the terminator.
#[must_use]
pub fn nullo<I: IntoIterator<Item = Term>>(terms: I, default: SeqKind) -> Goal {
    let terms: Vec<Term> = terms.into_iter().collect();

    Goal::dynamic(move |state| {
        let mut kind = None;

        for term in &terms {
            match state.walk(term) {
                Term::Var(_) => {}
                Term::Nil(found) => {
                    if *kind.get_or_insert(found) != found {
                        return fail();
                    }
                }
                _ => return fail(),
            }
        }

        let null = Term::Nil(kind.unwrap_or(default));
        crate::and(terms.iter().map(|term| eq(term.clone(), null.clone())))
    })
}

#[test]
fn test_conso_forward_backward() {
    use crate::run_all;

    let whole = Term::var("whole");
    let found = run_all(&whole, &conso(1, Term::list(vec![Term::int(2)]), whole.clone()));
    assert_eq!(found, [Term::list(vec![Term::int(1), Term::int(2)])]);

    let head = Term::var("head");
    let tail = Term::var("tail");
    let pair = Term::tuple(vec![head.clone(), tail.clone()]);
    let found = run_all(
        &pair,
        &conso(head.clone(), tail.clone(), Term::tuple(vec![Term::int(1), Term::int(2)])),
    );
    assert_eq!(
        found,
        [Term::tuple(vec![
            Term::int(1),
            Term::tuple(vec![Term::int(2)])
        ])]
    );
}

#[test]
fn test_conso_empty_fails() {
    use crate::run_all;

    let head = Term::var("head");
    let goal = conso(head.clone(), Term::var("tail"), Term::nil(SeqKind::List));
    assert!(run_all(&head, &goal).is_empty());
}

#[test]
fn test_nullo_infers_kind() {
    use crate::run_all;

    let x = Term::var("x");
    let goal = nullo(vec![x.clone(), Term::nil(SeqKind::Tuple)], SeqKind::List);
    assert_eq!(run_all(&x, &goal), [Term::nil(SeqKind::Tuple)]);

    let goal = nullo(vec![x.clone()], SeqKind::Expr);
    assert_eq!(run_all(&x, &goal), [Term::nil(SeqKind::Expr)]);
}

#[test]
fn test_nullo_mismatch() {
    use crate::run_all;

    let x = Term::var("x");
    let goal = nullo(
        vec![Term::nil(SeqKind::List), Term::nil(SeqKind::Tuple)],
        SeqKind::List,
    );
    assert!(run_all(&x, &goal).is_empty());

    let goal = nullo(vec![Term::list(vec![Term::int(1)])], SeqKind::List);
    assert!(run_all(&x, &goal).is_empty());
}
