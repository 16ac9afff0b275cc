use crate::error::Error;
use crate::term::Term;
use std::time::Duration;

/// Receive side of one dispatched future (parent ← worker).
pub trait FutureReply {
    /// Non-blocking check for the single reply. `Ok(None)` while the
    /// worker is still running.
    fn try_recv(&mut self) -> Result<Option<Term>, Error>;
}

/// Dispatches a fully bound application to an isolated worker.
pub trait Spawner {
    fn spawn(&mut self, application: Term) -> Result<Box<dyn FutureReply>, Error>;
}

/// Continuation run once every joined sibling has settled. Receives the
/// sibling results in their original positional order.
pub type Continuation = Box<dyn FnOnce(Vec<Term>, &mut dyn Spawner) -> Result<Outcome, Error>>;

/// Result of evaluating a term: either settled now, or waiting on workers.
pub enum Outcome {
    Ready(Term),
    Pending(Pending),
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }

    pub fn into_ready(self) -> Option<Term> {
        match self {
            Outcome::Ready(term) => Some(term),
            Outcome::Pending(_) => None,
        }
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ready(term) => f.debug_tuple("Ready").field(term).finish(),
            Outcome::Pending(_) => f.write_str("Pending"),
        }
    }
}

pub struct Pending {
    state: State,
}

enum State {
    Awaiting(Box<dyn FutureReply>),
    Joined {
        parts: Vec<Outcome>,
        then: Continuation,
    },
}

impl Pending {
    pub fn awaiting(reply: Box<dyn FutureReply>) -> Self {
        Self {
            state: State::Awaiting(reply),
        }
    }

    /// Advance without blocking. Returns `Outcome::Ready` once this
    /// pending result and everything it joins on has settled.
    pub fn poll(self, spawner: &mut dyn Spawner) -> Result<Outcome, Error> {
        match self.state {
            State::Awaiting(mut reply) => match reply.try_recv()? {
                Some(term) => Ok(Outcome::Ready(term)),
                None => Ok(Outcome::Pending(Pending::awaiting(reply))),
            },
            State::Joined { parts, then } => {
                let parts = parts
                    .into_iter()
                    .map(|part| match part {
                        Outcome::Pending(pending) => pending.poll(spawner),
                        ready => Ok(ready),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                join_boxed(parts, spawner, then)
            }
        }
    }
}

/// Combine sibling sub-evaluations. Runs `then` immediately when none is
/// pending; otherwise the whole node becomes pending on all of them and
/// `then` receives their results in the order given here, whichever
/// settled first.
pub fn join<const N: usize, F>(
    parts: [Outcome; N],
    spawner: &mut dyn Spawner,
    then: F,
) -> Result<Outcome, Error>
where
    F: FnOnce([Term; N], &mut dyn Spawner) -> Result<Outcome, Error> + 'static,
{
    join_boxed(
        parts.into(),
        spawner,
        Box::new(move |terms: Vec<Term>, spawner: &mut dyn Spawner| {
            let terms: [Term; N] = terms
                .try_into()
                .unwrap_or_else(|_| unreachable!("join preserves the number of siblings"));
            then(terms, spawner)
        }),
    )
}

fn join_boxed(
    parts: Vec<Outcome>,
    spawner: &mut dyn Spawner,
    then: Continuation,
) -> Result<Outcome, Error> {
    if parts.iter().any(Outcome::is_pending) {
        return Ok(Outcome::Pending(Pending {
            state: State::Joined { parts, then },
        }));
    }
    let terms = parts.into_iter().filter_map(Outcome::into_ready).collect();
    then(terms, spawner)
}

/// Drive an outcome to completion, sleeping `poll_interval` between
/// rounds that make no progress.
pub fn settle(
    outcome: Outcome,
    spawner: &mut dyn Spawner,
    poll_interval: Duration,
) -> Result<Term, Error> {
    let mut outcome = outcome;
    loop {
        match outcome {
            Outcome::Ready(term) => return Ok(term),
            Outcome::Pending(pending) => {
                outcome = pending.poll(spawner)?;
                if outcome.is_pending() {
                    std::thread::sleep(poll_interval);
                }
            }
        }
    }
}
