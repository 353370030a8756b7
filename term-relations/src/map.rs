//! Elementwise relations between sequences.
//!
//! `mapo` requires a relation to hold at every position, `map_anyo`
//! at one or more positions (the remaining elements must be equal).
//! Both work with either side unbound, and both fail on sequences of
//! different lengths or with different terminators.
//!
//! Each recursive step goes through `defer`, for the relation on the
//! heads as well as for the recursion on the tails, so that long or
//! unbounded sequences neither blow the stack nor starve sibling
//! branches.
use crate::config::MapConfig;
use crate::config::Relation;
use logic_stream::conso;
use logic_stream::defer;
use logic_stream::eq;
use logic_stream::fail;
use logic_stream::nullo;
use logic_stream::or;
use logic_stream::succeed;
use logic_stream::Goal;
use logic_stream::SeqKind;
use logic_stream::Term;
use std::rc::Rc;

/// `relation` holds between `a[i]` and `b[i]` for every position
/// `i`, and `a` and `b` have the same length and terminator.
#[must_use]
pub fn mapo<R>(relation: R, a: impl Into<Term>, b: impl Into<Term>, config: MapConfig) -> Goal
where
    R: Fn(Term, Term) -> Goal + 'static,
{
    map_all(
        Rc::new(relation),
        a.into(),
        b.into(),
        config.terminator,
        config.null_succeeds_at_first_call,
    )
}

/// `relation` holds between `a[i]` and `b[i]` for at least one
/// position `i`, and `a[j] == b[j]` at every position where it does
/// not hold.  `a` and `b` must have the same length and terminator.
///
/// The empty match is only accepted on the first call, and only when
/// `config.null_succeeds_at_first_call` is set.
#[must_use]
pub fn map_anyo<R>(
    relation: R,
    a: impl Into<Term>,
    b: impl Into<Term>,
    config: MapConfig,
) -> Goal
where
    R: Fn(Term, Term) -> Goal + 'static,
{
    map_any(
        Rc::new(relation),
        a.into(),
        b.into(),
        config.terminator,
        config.null_succeeds_at_first_call,
        AnyCursor::first(config.any_succeeded),
    )
}

/// `a` and `b` are sequences of the same length and terminator.
/// Succeeds once for ground sequences.
#[must_use]
pub fn eq_length(a: impl Into<Term>, b: impl Into<Term>, terminator: SeqKind) -> Goal {
    mapo(always, a, b, MapConfig::all().with_terminator(terminator))
}

/// The relation that holds between any two terms.
#[must_use]
pub fn always(_: Term, _: Term) -> Goal {
    succeed()
}

/// Defers `relation(a, b)`.
fn defer_relation(relation: &Relation, a: &Term, b: &Term) -> Goal {
    let relation = relation.clone();
    let (a, b) = (a.clone(), b.clone());

    defer(move || relation(a.clone(), b.clone()))
}

pub(crate) fn map_all(
    relation: Relation,
    a: Term,
    b: Term,
    terminator: SeqKind,
    null_succeeds: bool,
) -> Goal {
    let (a_head, a_tail) = (Term::var("a_head"), Term::var("a_tail"));
    let (b_head, b_tail) = (Term::var("b_head"), Term::var("b_tail"));

    let null = if null_succeeds {
        nullo(vec![a.clone(), b.clone()], terminator)
    } else {
        fail()
    };

    let heads = defer_relation(&relation, &a_head, &b_head);
    let tails = {
        let (a_tail, b_tail) = (a_tail.clone(), b_tail.clone());

        defer(move || {
            map_all(
                relation.clone(),
                a_tail.clone(),
                b_tail.clone(),
                terminator,
                true,
            )
        })
    };

    or(vec![
        vec![null],
        vec![
            conso(a_head, a_tail, a),
            conso(b_head, b_tail, b),
            heads,
            tails,
        ],
    ])
}

/// Where `map_any` is in a sequence: whether this is the initial
/// call, and whether the relation held for an earlier pair.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AnyCursor {
    first: bool,
    any_succeeded: bool,
}

impl AnyCursor {
    pub(crate) fn first(any_succeeded: bool) -> Self {
        Self {
            first: true,
            any_succeeded,
        }
    }

    fn next(self, succeeded_here: bool) -> Self {
        Self {
            first: false,
            any_succeeded: self.any_succeeded || succeeded_here,
        }
    }

    fn accepts_null(self, null_succeeds: bool) -> bool {
        self.any_succeeded || (self.first && null_succeeds)
    }
}

pub(crate) fn map_any(
    relation: Relation,
    a: Term,
    b: Term,
    terminator: SeqKind,
    null_succeeds: bool,
    cursor: AnyCursor,
) -> Goal {
    let (a_head, a_tail) = (Term::var("a_head"), Term::var("a_tail"));
    let (b_head, b_tail) = (Term::var("b_head"), Term::var("b_tail"));

    let null = if cursor.accepts_null(null_succeeds) {
        nullo(vec![a.clone(), b.clone()], terminator)
    } else {
        fail()
    };

    let tails = |succeeded_here: bool| {
        let relation = relation.clone();
        let (a_tail, b_tail) = (a_tail.clone(), b_tail.clone());
        let cursor = cursor.next(succeeded_here);

        defer(move || {
            map_any(
                relation.clone(),
                a_tail.clone(),
                b_tail.clone(),
                terminator,
                null_succeeds,
                cursor,
            )
        })
    };

    let related = vec![defer_relation(&relation, &a_head, &b_head), tails(true)];
    let unchanged = vec![eq(a_head.clone(), b_head.clone()), tails(false)];

    or(vec![
        vec![null],
        vec![
            conso(a_head, a_tail.clone(), a),
            conso(b_head, b_tail.clone(), b),
            or(vec![related, unchanged]),
        ],
    ])
}

#[cfg(test)]
fn ints(values: &[i64]) -> Vec<Term> {
    values.iter().copied().map(Term::int).collect()
}

#[cfg(test)]
fn increment(a: Term, b: Term) -> Goal {
    Goal::dynamic(move |state| match state.reify(&a) {
        Term::Int(value) => eq(b.clone(), value + 1),
        _ => fail(),
    })
}

#[cfg(test)]
fn never(_: Term, _: Term) -> Goal {
    fail()
}

#[cfg(test)]
fn same(a: Term, b: Term) -> Goal {
    eq(a, b)
}

#[test]
fn test_mapo_forward() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let input = Term::list(ints(&[1, 2, 3]));
    let goal = mapo(increment, input, q.clone(), MapConfig::all());

    assert_eq!(run_all(&q, &goal), [Term::list(ints(&[2, 3, 4]))]);
}

#[test]
fn test_mapo_infers_terminator() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let goal = mapo(same, Term::tuple(ints(&[1, 2])), q.clone(), MapConfig::all());

    assert_eq!(run_all(&q, &goal), [Term::tuple(ints(&[1, 2]))]);
}

#[test]
fn test_mapo_unbound_uses_configured_terminator() {
    use logic_stream::run;

    let a = Term::var("a");
    let b = Term::var("b");
    let pair = Term::tuple(vec![a.clone(), b.clone()]);
    let config = MapConfig::all().with_terminator(SeqKind::Tuple);

    let found = run(1, &pair, &mapo(same, a, b, config));
    assert_eq!(
        found,
        [Term::tuple(vec![Term::nil(SeqKind::Tuple), Term::nil(SeqKind::Tuple)])]
    );
}

#[test]
fn test_mapo_length_mismatch() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let goal = mapo(
        same,
        Term::list(ints(&[1, 2])),
        Term::list(ints(&[1, 2, 3])),
        MapConfig::all(),
    );

    assert!(run_all(&q, &goal).is_empty());
}

#[test]
fn test_mapo_terminator_mismatch() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let goal = mapo(same, Term::list(ints(&[1])), Term::tuple(ints(&[1])), MapConfig::all());

    assert!(run_all(&q, &goal).is_empty());
}

#[test]
fn test_mapo_empty() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let empty = Term::nil(SeqKind::List);

    let goal = mapo(never, empty.clone(), empty.clone(), MapConfig::all());
    assert_eq!(run_all(&q, &goal).len(), 1);

    let config = MapConfig::all().with_null_succeeds(false);
    let goal = mapo(never, empty.clone(), empty, config);
    assert!(run_all(&q, &goal).is_empty());
}

#[test]
fn test_mapo_long_sequence() {
    use logic_stream::run;

    let values: Vec<i64> = (0..1000).collect();
    let q = Term::var("q");
    let goal = mapo(same, Term::list(ints(&values)), q.clone(), MapConfig::all());

    assert_eq!(run(2, &q, &goal), [Term::list(ints(&values))]);
}

#[test]
fn test_mapo_very_long_sequence() {
    use logic_stream::run;

    let values: Vec<i64> = (0..100_000).collect();
    let q = Term::var("q");
    let goal = mapo(increment, Term::list(ints(&values)), q.clone(), MapConfig::all());

    let incremented: Vec<i64> = (1..=100_000).collect();
    assert_eq!(run(2, &q, &goal), [Term::list(ints(&incremented))]);
}

#[test]
fn test_eq_length_once() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let goal = eq_length(
        Term::list(ints(&[1, 2, 3])),
        Term::list(vec![Term::sym("a"), Term::sym("b"), Term::sym("c")]),
        SeqKind::List,
    );
    assert_eq!(run_all(&q, &goal).len(), 1);

    let goal = eq_length(
        Term::list(ints(&[1, 2, 3])),
        Term::list(ints(&[1, 2])),
        SeqKind::List,
    );
    assert!(run_all(&q, &goal).is_empty());
}

#[test]
fn test_eq_length_builds_fresh_sequence() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let goal = eq_length(Term::tuple(ints(&[1, 2])), q.clone(), SeqKind::List);

    match run_all(&q, &goal).as_slice() {
        [found] => {
            assert_eq!(found.terminator(), Some(SeqKind::Tuple));
            let items = found.to_vec().expect("proper sequence");
            assert_eq!(items.len(), 2);
            assert!(items.iter().all(Term::is_var));
        }
        other => panic!("unexpected results {:?}", other),
    }
}

#[test]
fn test_map_anyo_needs_one_change() {
    use logic_stream::run_all;
    use std::collections::BTreeSet;

    let q = Term::var("q");
    let goal = map_anyo(increment, Term::list(ints(&[1, 2])), q.clone(), MapConfig::any());

    let found: BTreeSet<String> = run_all(&q, &goal).iter().map(Term::to_string).collect();
    let expected: BTreeSet<String> = vec!["[2, 3]", "[2, 2]", "[1, 3]"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_map_anyo_never_relation() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let seq = Term::list(ints(&[1, 2]));

    let goal = map_anyo(never, seq.clone(), seq.clone(), MapConfig::any());
    assert!(run_all(&q, &goal).is_empty());

    // Elementwise-equal sequences still match when the relation is
    // taken to have held already.
    let config = MapConfig::any().with_any_succeeded(true);
    let goal = map_anyo(never, seq.clone(), seq, config);
    assert_eq!(run_all(&q, &goal).len(), 1);
}

#[test]
fn test_map_anyo_empty_sequences() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let empty = Term::nil(SeqKind::List);

    let goal = map_anyo(never, empty.clone(), empty.clone(), MapConfig::any());
    assert!(run_all(&q, &goal).is_empty());

    let config = MapConfig::any().with_null_succeeds(true);
    let goal = map_anyo(never, empty.clone(), empty.clone(), config);
    assert_eq!(run_all(&q, &goal).len(), 1);

    // Only the initial call may accept an empty match.
    let goal = map_anyo(never, Term::list(ints(&[1])), Term::list(ints(&[1])), config);
    assert!(run_all(&q, &goal).is_empty());
}

#[test]
fn test_map_anyo_length_mismatch() {
    use logic_stream::run_all;

    let q = Term::var("q");
    let goal = map_anyo(
        increment,
        Term::list(ints(&[1])),
        Term::list(ints(&[2, 3])),
        MapConfig::any(),
    );

    assert!(run_all(&q, &goal).is_empty());
}
