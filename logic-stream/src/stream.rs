//! Streams of result states.
//!
//! A goal maps a state to a `Stream`, which may be empty, may have a
//! state ready right away, or may still have work to do before it
//! can tell.  Pending work is either a suspension, which produces the
//! rest of the stream when forced, or a combination (`mplus`, `bind`,
//! `append`) of streams that are themselves pending.  Suspensions are
//! what keep recursive relations from building their whole (possibly
//! infinite) search tree up front.
//!
//! Combinations are plain data, not closures wrapped around
//! closures.  `StreamIter` drives the search from a loop: each call
//! to `advance` walks down the pending combinations with an explicit
//! stack, forces a single suspension, and rebuilds the path above it.
//! Recursive relations that suspend in tail position (the way
//! `defer` is used throughout) keep that path a constant length, so
//! neither the native stack nor the work per step grows with the
//! depth of the search.
//!
//! Suspensions are also the only points where `mplus` interleaves its
//! two inputs.  Between suspensions, results are produced in the
//! literal, left-to-right order of the goals.
use crate::Goal;
use crate::State;
use std::collections::VecDeque;

type Thunk = Box<dyn FnOnce() -> Stream>;

pub struct Stream(Node);

enum Node {
    Empty,
    Mature(State, Box<Node>),
    Immature(Thunk),
    /// Pending left stream, then the right one.  The two swap every
    /// time the left one is advanced.
    Mplus(Box<Node>, Box<Node>),
    /// Pending stream whose states are fed to the goal.
    Bind(Box<Node>, Goal),
    /// The stream, followed by whatever each thunk produces, in
    /// order.  Thunks are only called once everything before them is
    /// exhausted.
    Append(Box<Node>, VecDeque<Thunk>),
}

/// The path from the root of a pending stream down to the suspension
/// being forced.
enum Frame {
    Mplus(Node),
    Bind(Goal),
    Append(VecDeque<Thunk>),
}

impl Node {
    fn is_ready(&self) -> bool {
        matches!(self, Node::Empty | Node::Mature(..))
    }
}

/// Splits the states that are ready at the front of `node` from the
/// rest of the stream.
fn split_mature(mut node: Node) -> (Vec<State>, Node) {
    let mut states = Vec::new();

    while let Node::Mature(state, rest) = node {
        states.push(state);
        node = *rest;
    }

    (states, node)
}

fn prepend(states: Vec<State>, tail: Node) -> Node {
    states
        .into_iter()
        .rev()
        .fold(tail, |rest, state| Node::Mature(state, Box::new(rest)))
}

fn mplus(left: Node, right: Node) -> Node {
    let (states, tail) = split_mature(left);
    let tail = match (tail, right) {
        (Node::Empty, right) => right,
        (tail, Node::Empty) => tail,
        (tail, right) => Node::Mplus(Box::new(tail), Box::new(right)),
    };

    prepend(states, tail)
}

fn bind(node: Node, goal: Goal) -> Node {
    let (states, tail) = split_mature(node);
    // Apply `goal` in stream order before merging back to front.
    let heads: Vec<Node> = states
        .into_iter()
        .map(|state| goal.apply(state).into_node())
        .collect();
    let tail = match tail {
        Node::Empty => Node::Empty,
        pending => Node::Bind(Box::new(pending), goal),
    };

    heads.into_iter().rev().fold(tail, |rest, head| mplus(head, rest))
}

/// Returns `front` followed by `back`, moving the shorter of the two.
fn concat(mut front: VecDeque<Thunk>, mut back: VecDeque<Thunk>) -> VecDeque<Thunk> {
    if front.len() >= back.len() {
        front.extend(back);
        front
    } else {
        while let Some(later) = front.pop_back() {
            back.push_front(later);
        }
        back
    }
}

fn append(mut node: Node, mut laters: VecDeque<Thunk>) -> Node {
    loop {
        if laters.is_empty() {
            return node;
        }

        match node {
            Node::Empty => {
                if let Some(later) = laters.pop_front() {
                    node = later().into_node();
                }
            }
            Node::Mature(..) => {
                // Leave the thunks alone until someone asks for more.
                let (states, tail) = split_mature(node);
                let tail = match tail {
                    Node::Append(inner, more) => Node::Append(inner, concat(more, laters)),
                    tail => Node::Append(Box::new(tail), laters),
                };
                return prepend(states, tail);
            }
            Node::Append(inner, more) => return Node::Append(inner, concat(more, laters)),
            pending => return Node::Append(Box::new(pending), laters),
        }
    }
}

/// Does one unit of work on a pending stream: forces the suspension
/// at the bottom of its leftmost path, or calls the next thunk of an
/// exhausted `Append`.
fn advance(mut node: Node) -> Node {
    let mut frames = Vec::new();

    let mut result = loop {
        match node {
            Node::Mplus(left, right) => {
                frames.push(Frame::Mplus(*right));
                node = *left;
            }
            Node::Bind(inner, goal) => {
                frames.push(Frame::Bind(goal));
                node = *inner;
            }
            Node::Append(inner, laters) => {
                if inner.is_ready() {
                    break append(*inner, laters);
                }

                frames.push(Frame::Append(laters));
                node = *inner;
            }
            Node::Immature(thunk) => break thunk().into_node(),
            ready => break ready,
        }
    };

    while let Some(frame) = frames.pop() {
        result = match frame {
            Frame::Mplus(right) => mplus(right, result),
            Frame::Bind(goal) => bind(result, goal),
            Frame::Append(laters) => append(result, laters),
        };
    }

    result
}

impl Stream {
    #[must_use]
    pub fn empty() -> Self {
        Stream(Node::Empty)
    }

    #[must_use]
    pub fn unit(state: State) -> Self {
        Stream(Node::Mature(state, Box::new(Node::Empty)))
    }

    /// Delays `thunk` until the stream is forced.
    #[must_use]
    pub fn suspend(thunk: impl FnOnce() -> Stream + 'static) -> Self {
        Stream(Node::Immature(Box::new(thunk)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Node::Empty)
    }

    fn into_node(mut self) -> Node {
        std::mem::replace(&mut self.0, Node::Empty)
    }

    /// Merges two streams.  Results ready in `self` come first, but
    /// whenever `self` suspends, `other` gets to run until it
    /// suspends in turn.
    #[must_use]
    pub fn mplus(self, other: Stream) -> Stream {
        Stream(mplus(self.into_node(), other.into_node()))
    }

    /// Concatenates `self` and the stream built by `later`.  `later`
    /// is only called once `self` is exhausted, so nothing from it
    /// shows up before every result of `self`.
    #[must_use]
    pub fn append(self, later: Box<dyn FnOnce() -> Stream>) -> Stream {
        Stream(append(self.into_node(), VecDeque::from(vec![later])))
    }

    /// Feeds every state in `self` to `goal`, and merges the results.
    #[must_use]
    pub fn bind(self, goal: Goal) -> Stream {
        Stream(bind(self.into_node(), goal))
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        let mut pending = vec![std::mem::replace(&mut self.0, Node::Empty)];

        while let Some(node) = pending.pop() {
            match node {
                Node::Mature(_, rest) => pending.push(*rest),
                Node::Mplus(left, right) => {
                    pending.push(*left);
                    pending.push(*right);
                }
                Node::Bind(inner, _) => pending.push(*inner),
                Node::Append(inner, _) => pending.push(*inner),
                Node::Empty | Node::Immature(_) => {}
            }
        }
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Node::Empty => write!(f, "Empty"),
            Node::Mature(state, _) => write!(f, "Mature({:?}, ..)", state),
            _ => write!(f, "Pending(..)"),
        }
    }
}

impl IntoIterator for Stream {
    type Item = State;
    type IntoIter = StreamIter;

    fn into_iter(self) -> StreamIter {
        StreamIter(self.into_node())
    }
}

/// Pulls states out of a `Stream`, advancing pending work in a loop.
pub struct StreamIter(Node);

impl Iterator for StreamIter {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        loop {
            match std::mem::replace(&mut self.0, Node::Empty) {
                Node::Empty => return None,
                Node::Mature(state, rest) => {
                    self.0 = *rest;
                    return Some(state);
                }
                pending => self.0 = advance(pending),
            }
        }
    }
}

impl Drop for StreamIter {
    fn drop(&mut self) {
        drop(Stream(std::mem::replace(&mut self.0, Node::Empty)));
    }
}

#[cfg(test)]
thread_local! {
    static TAG: crate::Var = crate::Var::fresh("tag");
}

#[cfg(test)]
fn tagged(tag: i64) -> State {
    use crate::Term;

    TAG.with(|var| State::new().extend(*var, Term::int(tag)))
        .expect("fresh variable")
}

#[cfg(test)]
fn tags(stream: Stream) -> Vec<i64> {
    use crate::Term;

    stream
        .into_iter()
        .map(|state| match TAG.with(|var| state.walk(&Term::Var(*var))) {
            Term::Int(value) => value,
            other => panic!("untagged state: {}", other),
        })
        .collect()
}

#[test]
fn test_mplus_mature_order() {
    let left = Stream::unit(tagged(1)).mplus(Stream::unit(tagged(2)));
    let right = Stream::unit(tagged(3));

    assert_eq!(tags(left.mplus(right)), [1, 2, 3]);
}

#[test]
fn test_mplus_interleaves_at_suspensions() {
    let left = Stream::suspend(|| Stream::unit(tagged(1)));
    let right = Stream::unit(tagged(2));

    // `left` suspends, so `right` goes first.
    assert_eq!(tags(left.mplus(right)), [2, 1]);
}

#[test]
fn test_append_is_ordered() {
    let left = Stream::suspend(|| Stream::unit(tagged(1)));
    let appended = left.append(Box::new(|| Stream::unit(tagged(2))));

    assert_eq!(tags(appended), [1, 2]);
}

#[test]
fn test_append_is_lazy() {
    use std::cell::Cell;
    use std::rc::Rc;

    let called = Rc::new(Cell::new(false));
    let flag = called.clone();
    let mut iter = Stream::unit(tagged(1))
        .append(Box::new(move || {
            flag.set(true);
            Stream::empty()
        }))
        .into_iter();

    assert!(iter.next().is_some());
    assert!(!called.get());
    assert!(iter.next().is_none());
    assert!(called.get());
}

#[test]
fn test_deep_suspension_chain() {
    fn countdown(n: u32) -> Stream {
        if n == 0 {
            Stream::unit(tagged(0))
        } else {
            Stream::suspend(move || countdown(n - 1))
        }
    }

    // Forcing happens in `StreamIter::next`'s loop, not recursively.
    assert_eq!(tags(countdown(1_000_000)), [0]);
}

#[test]
fn test_nested_binds_force_iteratively() {
    use crate::succeed;

    // Every level adds a conjunct on top of a suspension.
    fn nested(n: u32) -> Stream {
        if n == 0 {
            Stream::unit(tagged(0))
        } else {
            Stream::suspend(move || nested(n - 1)).bind(succeed())
        }
    }

    assert_eq!(tags(nested(10_000)), [0]);
}

#[test]
fn test_drop_long_stream() {
    let mut stream = Stream::suspend(Stream::empty);
    for tag in 0..100_000 {
        stream = Stream::unit(tagged(tag)).mplus(stream);
    }

    let mut iter = stream.into_iter();
    assert_eq!(iter.next().map(|_| ()), Some(()));
    drop(iter);
}
