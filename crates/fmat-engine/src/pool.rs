//! A fixed pool of worker threads, each owning a factory snapshot.
//!
//! The pool is created once from the parent's factory. Every worker gets
//! its own deep copy registered under the pool's handle, and from then on
//! only operations, handles and drained results cross the channels.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::debug;

use crate::buffer::{MergedResults, WorkerOutput};
use crate::config::EngineConfig;
use crate::context::WorkerContext;
use crate::error::{EngineError, Result};
use crate::factory::{Factory, StateDigest, StateUpdate};
use crate::handle::{next_pool_id, FactoryHandle};
use crate::operation::Operation;
use crate::partition::Partition;

/// A request to one worker.
#[derive(Debug)]
enum Command {
    Run(FactoryHandle, Operation),
    Collect,
    Digest(FactoryHandle),
    Release(FactoryHandle),
    Shutdown,
}

/// A worker's answer to one command.
#[derive(Debug)]
enum Reply {
    Ran(Result<usize>),
    Collected(Vec<WorkerOutput>),
    Digest(Result<StateDigest>),
    Released(Result<()>),
}

/// The parent's end of one worker.
#[derive(Debug)]
struct WorkerLink {
    commands: Sender<Command>,
    replies: Receiver<Reply>,
    thread: Option<JoinHandle<()>>,
}

fn worker_loop(mut ctx: WorkerContext, commands: &Receiver<Command>, replies: &Sender<Reply>) {
    while let Ok(command) = commands.recv() {
        let reply = match command {
            Command::Run(handle, op) => Reply::Ran(ctx.dispatch(handle, &op)),
            Command::Collect => Reply::Collected(ctx.collect()),
            Command::Digest(handle) => Reply::Digest(ctx.digest(handle)),
            Command::Release(handle) => Reply::Released(ctx.release(handle)),
            Command::Shutdown => break,
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
    ctx.teardown();
    debug!(worker = ctx.worker_id(), "worker stopped");
}

/// A pool of worker threads sharing one factory handle.
#[derive(Debug)]
pub struct WorkerPool {
    handle: FactoryHandle,
    workers: Vec<WorkerLink>,
}

impl WorkerPool {
    /// Starts `config.worker_count` workers, each with a snapshot of `factory`.
    ///
    /// # Errors
    ///
    /// Returns `WorkerSpawn` if a thread cannot be started; workers already
    /// started are shut down.
    pub fn fork(factory: &Factory, config: &EngineConfig) -> Result<Self> {
        let count = config.worker_count.max(1);
        let pool_id = next_pool_id();
        let handle = FactoryHandle::new(pool_id, 0);
        let mut pool = Self {
            handle,
            workers: Vec::with_capacity(count),
        };

        for worker_id in 0..count {
            let mut ctx = WorkerContext::new(worker_id, pool_id, config.clone());
            ctx.install(handle, factory.clone())?;

            let (command_tx, command_rx) = bounded::<Command>(1);
            let (reply_tx, reply_rx) = bounded::<Reply>(1);
            let thread = thread::Builder::new()
                .name(format!("fmat-worker-{worker_id}"))
                .spawn(move || worker_loop(ctx, &command_rx, &reply_tx))
                .map_err(|source| EngineError::WorkerSpawn { worker_id, source })?;

            pool.workers.push(WorkerLink {
                commands: command_tx,
                replies: reply_rx,
                thread: Some(thread),
            });
        }

        debug!(pool = pool_id, workers = count, vars = factory.num_vars(), "worker pool forked");
        Ok(pool)
    }

    /// Returns the handle every worker registered its factory under.
    #[must_use]
    pub fn handle(&self) -> FactoryHandle {
        self.handle
    }

    /// Returns the number of live workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Sends one command per worker, then waits for every reply.
    ///
    /// Every worker that received a command is drained before the first
    /// error is returned, so no reply is left behind for the next round.
    fn exchange<F>(&self, mut make: F) -> Result<Vec<Reply>>
    where
        F: FnMut(usize) -> Result<Command>,
    {
        let mut first_error = None;
        let mut sent = vec![false; self.workers.len()];

        for (worker_id, link) in self.workers.iter().enumerate() {
            match make(worker_id) {
                Ok(command) => {
                    if link.commands.send(command).is_ok() {
                        sent[worker_id] = true;
                    } else {
                        first_error.get_or_insert(EngineError::WorkerLost { worker_id });
                    }
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        let mut replies = Vec::with_capacity(self.workers.len());
        for (worker_id, link) in self.workers.iter().enumerate() {
            if !sent[worker_id] {
                continue;
            }
            match link.replies.recv() {
                Ok(reply) => replies.push(reply),
                Err(_) => {
                    first_error.get_or_insert(EngineError::WorkerLost { worker_id });
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(replies),
        }
    }

    /// Runs `op` on every worker, each on its own partition.
    ///
    /// Returns the number of results each worker appended.
    ///
    /// # Errors
    ///
    /// Returns the first worker error after every worker has answered.
    pub fn run_all(&self, op: &Operation) -> Result<Vec<usize>> {
        let count = self.workers.len();
        let replies = self.exchange(|w| {
            Ok(Command::Run(self.handle, op.with_partition(Partition::new(w, count)?)))
        })?;

        let mut first_error = None;
        let mut appended = Vec::with_capacity(replies.len());
        for (worker_id, reply) in replies.into_iter().enumerate() {
            match reply {
                Reply::Ran(Ok(n)) => appended.push(n),
                Reply::Ran(Err(err)) => {
                    first_error.get_or_insert(err);
                }
                _ => {
                    first_error.get_or_insert(EngineError::WorkerLost { worker_id });
                }
            }
        }
        first_error.map_or(Ok(appended), Err)
    }

    /// Runs `op` unchanged on a single worker.
    ///
    /// # Errors
    ///
    /// Returns `PartitionOutOfRange` for an unknown worker, `WorkerLost` if
    /// it is gone, or the operation's error.
    pub fn run_on(&self, worker_id: usize, op: &Operation) -> Result<usize> {
        let link = self.link(worker_id)?;
        link.commands
            .send(Command::Run(self.handle, op.clone()))
            .map_err(|_| EngineError::WorkerLost { worker_id })?;
        match link.replies.recv() {
            Ok(Reply::Ran(result)) => result,
            _ => Err(EngineError::WorkerLost { worker_id }),
        }
    }

    fn link(&self, worker_id: usize) -> Result<&WorkerLink> {
        self.workers.get(worker_id).ok_or(EngineError::PartitionOutOfRange {
            worker_id,
            worker_count: self.workers.len(),
        })
    }

    /// Drains every worker's result buffer.
    ///
    /// # Errors
    ///
    /// Returns `WorkerLost` if a worker is gone.
    pub fn collect(&self) -> Result<Vec<Vec<WorkerOutput>>> {
        self.exchange(|_| Ok(Command::Collect))?
            .into_iter()
            .enumerate()
            .map(|(worker_id, reply)| match reply {
                Reply::Collected(items) => Ok(items),
                _ => Err(EngineError::WorkerLost { worker_id }),
            })
            .collect()
    }

    /// Runs `op` on every worker and merges the drained results.
    ///
    /// # Errors
    ///
    /// Returns the first worker error; buffers are drained either way.
    pub fn map_reduce(&self, op: &Operation) -> Result<MergedResults> {
        let ran = self.run_all(op);
        let collected = self.collect()?;
        ran?;

        let mut merged = MergedResults::new();
        for items in collected {
            merged.merge(items);
        }
        Ok(merged)
    }

    /// Applies a state update in every worker and waits for all of them.
    ///
    /// # Errors
    ///
    /// Returns the first worker error after every worker has answered.
    pub fn broadcast(&self, update: Arc<StateUpdate>) -> Result<()> {
        self.run_all(&Operation::BroadcastUpdate(update)).map(drop)
    }

    /// Returns the state digest of every worker's factory copy.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` after [`release`](Self::release), or
    /// `WorkerLost` if a worker is gone.
    pub fn digests(&self) -> Result<Vec<StateDigest>> {
        self.exchange(|_| Ok(Command::Digest(self.handle)))?
            .into_iter()
            .enumerate()
            .map(|(worker_id, reply)| match reply {
                Reply::Digest(result) => result,
                _ => Err(EngineError::WorkerLost { worker_id }),
            })
            .collect()
    }

    /// Invalidates the pool handle in every worker.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle was already released.
    pub fn release(&self) -> Result<()> {
        for (worker_id, reply) in self.exchange(|_| Ok(Command::Release(self.handle)))?.into_iter().enumerate() {
            match reply {
                Reply::Released(result) => result?,
                _ => return Err(EngineError::WorkerLost { worker_id }),
            }
        }
        Ok(())
    }

    /// Stops every worker and joins its thread.
    pub fn shutdown(&mut self) {
        for link in &self.workers {
            let _ = link.commands.send(Command::Shutdown);
        }
        for link in &mut self.workers {
            if let Some(thread) = link.thread.take() {
                let _ = thread.join();
            }
        }
        if !self.workers.is_empty() {
            debug!(pool = self.handle.pool(), "worker pool shut down");
        }
        self.workers.clear();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
