//! Goals are first-class values: functions from a `State` to a
//! `Stream` of states that satisfy them.
//!
//! Relations are ordinary Rust functions that return goals.  They
//! never look inside the goals they combine; all they do is build,
//! store and pass them around.  A goal can be applied to any number
//! of states, and each application is independent.
//!
//! Recursive relations must go through `defer` (or `Goal::dynamic`,
//! which only builds its goal once a state is available), otherwise
//! constructing the goal would recurse without bound.
use crate::State;
use crate::Stream;
use crate::Term;
use std::rc::Rc;

#[derive(Clone)]
pub struct Goal(Rc<dyn Fn(State) -> Stream>);

impl Goal {
    #[must_use]
    pub fn new(fun: impl Fn(State) -> Stream + 'static) -> Self {
        Goal(Rc::new(fun))
    }

    /// Returns a goal that is only constructed once a state is
    /// available, with access to that state.  Relations use this to
    /// reify their arguments and pick a strategy accordingly.
    #[must_use]
    pub fn dynamic(builder: impl Fn(&State) -> Goal + 'static) -> Self {
        Goal::new(move |state| builder(&state).apply(state))
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, state: State) -> Stream {
        (self.0)(state)
    }

    /// Evaluates this goal from the empty substitution.
    #[must_use]
    pub fn run(&self) -> Stream {
        self.run_from(State::new())
    }

    #[must_use]
    pub fn run_from(&self, state: State) -> Stream {
        self.apply(state)
    }
}

impl std::fmt::Debug for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Goal(..)")
    }
}

/// Succeeds once when `u` and `v` unify.
#[must_use]
pub fn eq(u: impl Into<Term>, v: impl Into<Term>) -> Goal {
    let u = u.into();
    let v = v.into();

    Goal::new(move |state| match state.unify(&u, &v) {
        Some(state) => Stream::unit(state),
        None => Stream::empty(),
    })
}

#[must_use]
pub fn succeed() -> Goal {
    Goal::new(Stream::unit)
}

#[must_use]
pub fn fail() -> Goal {
    Goal::new(|_| Stream::empty())
}

/// The conjunction of `goals`; succeeds when all of them do.  An
/// empty conjunction succeeds.
#[must_use]
pub fn and<I: IntoIterator<Item = Goal>>(goals: I) -> Goal {
    let goals: Vec<Goal> = goals.into_iter().collect();

    match goals.len() {
        0 => succeed(),
        1 => goals[0].clone(),
        _ => Goal::new(move |state| {
            let mut iter = goals.iter();
            let first = match iter.next() {
                Some(goal) => goal.apply(state),
                None => Stream::unit(state),
            };

            iter.fold(first, |stream, goal| stream.bind(goal.clone()))
        }),
    }
}

fn conjunctions<I, J>(branches: I) -> Vec<Goal>
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = Goal>,
{
    branches.into_iter().map(and).collect()
}

/// A disjunction of conjunctions (a `conde`): succeeds whenever one
/// of the `branches` succeeds.  Branches are tried left to right, and
/// interleave at suspensions.
#[must_use]
pub fn or<I, J>(branches: I) -> Goal
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = Goal>,
{
    let branches = conjunctions(branches);

    Goal::new(move |state| {
        branches
            .iter()
            .rev()
            .fold(Stream::empty(), |rest, branch| {
                branch.apply(state.clone()).mplus(rest)
            })
    })
}

/// Same as `or`, except that each branch is only evaluated once the
/// branches to its left have been exhausted: every result of the
/// first branch comes before any result of the second.
///
/// This choice is not fair.  If a branch has infinitely many
/// results (or diverges), the branches after it never run.
#[must_use]
pub fn or_ordered<I, J>(branches: I) -> Goal
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = Goal>,
{
    let branches: Rc<[Goal]> = conjunctions(branches).into();

    fn chain(branches: Rc<[Goal]>, index: usize, state: State) -> Stream {
        match branches.get(index) {
            None => Stream::empty(),
            Some(branch) => {
                let head = branch.apply(state.clone());
                head.append(Box::new(move || chain(branches, index + 1, state)))
            }
        }
    }

    Goal::new(move |state| chain(branches.clone(), 0, state))
}

/// Defers construction of the goal returned by `builder` until the
/// goal is applied, and starts its stream with a suspension.  This is
/// the trampoline every recursive relation goes through.
#[must_use]
pub fn defer(builder: impl Fn() -> Goal + 'static) -> Goal {
    let builder = Rc::new(builder);

    Goal::new(move |state| {
        let builder = builder.clone();
        Stream::suspend(move || builder().apply(state))
    })
}

/// Returns the first `count` reified values of `query` that satisfy
/// `goal`.
#[must_use]
pub fn run(count: usize, query: &Term, goal: &Goal) -> Vec<Term> {
    let _span = tracing::debug_span!("run", count).entered();

    goal.run()
        .into_iter()
        .take(count)
        .map(|state| state.reify(query))
        .collect()
}

/// Returns all the reified values of `query` that satisfy `goal`.
/// Only returns if `goal` has finitely many results.
#[must_use]
pub fn run_all(query: &Term, goal: &Goal) -> Vec<Term> {
    run(usize::MAX, query, goal)
}

#[test]
fn test_eq() {
    let x = Term::var("x");

    assert_eq!(run_all(&x, &eq(x.clone(), 42)), [Term::int(42)]);
    assert_eq!(run_all(&x, &eq(1, 2)), Vec::<Term>::new());
    assert_eq!(run_all(&x, &eq(1, 1)), [x.clone()]);
}

#[test]
fn test_succeed_fail() {
    assert_eq!(succeed().run().into_iter().count(), 1);
    assert_eq!(fail().run().into_iter().count(), 0);
    assert_eq!(and(vec![]).run().into_iter().count(), 1);
    assert_eq!(or(Vec::<Vec<Goal>>::new()).run().into_iter().count(), 0);
}

#[test]
fn test_and() {
    let x = Term::var("x");
    let y = Term::var("y");

    let goal = and(vec![eq(x.clone(), y.clone()), eq(y.clone(), "olive")]);
    assert_eq!(run_all(&x, &goal), [Term::sym("olive")]);

    let clash = and(vec![eq(x.clone(), "olive"), eq(x.clone(), "oil")]);
    assert!(run_all(&x, &clash).is_empty());
}

#[test]
fn test_or_left_to_right() {
    let x = Term::var("x");

    let goal = or(vec![
        vec![eq(x.clone(), "virgin")],
        vec![eq(x.clone(), "olive")],
        vec![eq(x.clone(), "oil")],
    ]);
    assert_eq!(
        run_all(&x, &goal),
        [Term::sym("virgin"), Term::sym("olive"), Term::sym("oil")]
    );
}

#[test]
fn test_or_interleaves_infinite_branch() {
    fn ones(x: Term) -> Goal {
        let inner = x.clone();
        or(vec![
            vec![eq(x, 1)],
            vec![defer(move || ones(inner.clone()))],
        ])
    }

    let x = Term::var("x");
    // The infinite branch comes first, but suspends, so the other
    // branch still produces results.
    let goal = or(vec![vec![ones(x.clone())], vec![eq(x.clone(), 2)]]);
    let found = run(4, &x, &goal);

    assert_eq!(found.len(), 4);
    assert!(found.contains(&Term::int(2)));
}

#[test]
fn test_or_ordered_exhausts_left_first() {
    let x = Term::var("x");
    let goal = or_ordered(vec![
        vec![defer({
            let x = x.clone();
            move || or(vec![vec![eq(x.clone(), 1)], vec![eq(x.clone(), 2)]])
        })],
        vec![eq(x.clone(), 3)],
    ]);

    assert_eq!(
        run_all(&x, &goal),
        [Term::int(1), Term::int(2), Term::int(3)]
    );
}

#[test]
fn test_defer_is_lazy() {
    use std::cell::Cell;

    let built = Rc::new(Cell::new(0));
    let counter = built.clone();
    let goal = defer(move || {
        counter.set(counter.get() + 1);
        succeed()
    });

    assert_eq!(built.get(), 0);
    let stream = goal.run();
    assert_eq!(built.get(), 0);
    assert_eq!(stream.into_iter().count(), 1);
    assert_eq!(built.get(), 1);
}

#[test]
fn test_dynamic_sees_state() {
    let x = Term::var("x");
    let y = Term::var("y");

    let doubled = {
        let x = x.clone();
        let y = y.clone();
        Goal::dynamic(move |state| match state.reify(&x) {
            Term::Int(value) => eq(y.clone(), value * 2),
            _ => fail(),
        })
    };

    assert_eq!(run_all(&y, &and(vec![eq(x.clone(), 21), doubled.clone()])), [Term::int(42)]);
    assert!(run_all(&y, &doubled).is_empty());
}
