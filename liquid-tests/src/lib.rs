//! Spawners that evaluate futures in-process, for tests that need to
//! control when each reply arrives.

use liquid_core::{Error, FutureReply, Spawner, Term, settle};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Evaluates each future immediately on the calling thread. Replies are
/// ready on the first poll.
#[derive(Default)]
pub struct InlineSpawner {
    spawned: usize,
}

impl InlineSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }
}

impl Spawner for InlineSpawner {
    fn spawn(&mut self, application: Term) -> Result<Box<dyn FutureReply>, Error> {
        self.spawned += 1;
        let result = run_isolated(application);
        Ok(Box::new(ReadyReply {
            result: Some(result),
        }))
    }
}

struct ReadyReply {
    result: Option<Result<Term, Error>>,
}

impl FutureReply for ReadyReply {
    fn try_recv(&mut self) -> Result<Option<Term>, Error> {
        match self.result.take() {
            Some(result) => result.map(Some),
            None => panic!("reply polled after it was delivered"),
        }
    }
}

/// Evaluate the way a worker would: to completion, with any error
/// flattened to the string the worker would send back.
fn run_isolated(application: Term) -> Result<Term, Error> {
    let mut nested = InlineSpawner::new();
    application
        .evaluate(&mut nested)
        .and_then(|outcome| settle(outcome, &mut nested, Duration::ZERO))
        .map_err(|e| Error::FutureFailed(e.to_string()))
}

#[derive(Default)]
struct Script {
    /// Future ids in the order their replies are released, one per poll.
    order: VecDeque<usize>,
    released: Vec<usize>,
    delivered: Vec<usize>,
    polls: usize,
}

/// Evaluates futures in-process but withholds each reply until the script
/// releases it. Futures are numbered from 0 in dispatch order.
pub struct ScriptedSpawner {
    script: Rc<RefCell<Script>>,
    spawned: usize,
}

impl ScriptedSpawner {
    /// Release replies in `order`; futures not named are released
    /// afterwards in dispatch order.
    pub fn new(order: &[usize]) -> Self {
        Self {
            script: Rc::new(RefCell::new(Script {
                order: order.iter().copied().collect(),
                ..Script::default()
            })),
            spawned: 0,
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Ids of the futures whose replies were consumed, in consumption order.
    pub fn delivered(&self) -> Vec<usize> {
        self.script.borrow().delivered.clone()
    }

    /// Total number of reply polls.
    pub fn polls(&self) -> usize {
        self.script.borrow().polls
    }
}

impl Spawner for ScriptedSpawner {
    fn spawn(&mut self, application: Term) -> Result<Box<dyn FutureReply>, Error> {
        let id = self.spawned;
        self.spawned += 1;
        let mut script = self.script.borrow_mut();
        if !script.order.contains(&id) && !script.released.contains(&id) {
            script.order.push_back(id);
        }
        Ok(Box::new(ScriptedReply {
            id,
            result: Some(run_isolated(application)),
            script: Rc::clone(&self.script),
        }))
    }
}

struct ScriptedReply {
    id: usize,
    result: Option<Result<Term, Error>>,
    script: Rc<RefCell<Script>>,
}

impl FutureReply for ScriptedReply {
    fn try_recv(&mut self) -> Result<Option<Term>, Error> {
        let mut script = self.script.borrow_mut();
        script.polls += 1;
        if script.released.len() < script.polls
            && let Some(next) = script.order.pop_front()
        {
            script.released.push(next);
        }
        if !script.released.contains(&self.id) {
            return Ok(None);
        }
        script.delivered.push(self.id);
        match self.result.take() {
            Some(result) => result.map(Some),
            None => panic!("future {} polled after its reply was delivered", self.id),
        }
    }
}
