//! Background evaluation worker
//!
//! Bridges the sync tick loop with an evaluator running off-thread. Jobs go in
//! over one channel, replies come back over another; the loop polls without
//! blocking. Nothing is shared but the messages.

use std::collections::VecDeque;
use std::io;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;

use zapzap_core::game_state::BotJob;

use crate::bot::{evaluate_job, BotReply};

/// Where the session sends evaluation jobs
pub trait Opponent {
    fn request(&mut self, job: BotJob);

    /// Next finished reply, if any; never blocks
    fn poll(&mut self) -> Option<BotReply>;
}

/// Evaluator on a tokio blocking pool
pub struct BotWorker {
    _rt: Runtime,
    job_tx: mpsc::UnboundedSender<BotJob>,
    reply_rx: mpsc::UnboundedReceiver<BotReply>,
}

impl BotWorker {
    pub fn start() -> io::Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("zapzap-bot")
            .build()?;

        let (job_tx, mut job_rx) = mpsc::unbounded_channel::<BotJob>();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel::<BotReply>();

        rt.spawn(async move {
            while let Some(job) = job_rx.recv().await {
                let reply = match tokio::task::spawn_blocking(move || evaluate_job(&job)).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        log::warn!("bot evaluation failed: {}", e);
                        continue;
                    }
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            _rt: rt,
            job_tx,
            reply_rx,
        })
    }

    /// Block until the next reply; `None` once the worker has stopped
    ///
    /// Must not be called from inside an async context.
    pub fn wait(&mut self) -> Option<BotReply> {
        self.reply_rx.blocking_recv()
    }
}

impl Opponent for BotWorker {
    fn request(&mut self, job: BotJob) {
        if self.job_tx.send(job).is_err() {
            log::warn!("bot worker stopped; job dropped");
        }
    }

    fn poll(&mut self) -> Option<BotReply> {
        self.reply_rx.try_recv().ok()
    }
}

/// Evaluates on the calling thread; replies are ready on the next poll
#[derive(Debug, Default)]
pub struct InlineOpponent {
    replies: VecDeque<BotReply>,
}

impl InlineOpponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.replies.len()
    }
}

impl Opponent for InlineOpponent {
    fn request(&mut self, job: BotJob) {
        self.replies.push_back(evaluate_job(&job));
    }

    fn poll(&mut self) -> Option<BotReply> {
        self.replies.pop_front()
    }
}

/// No opponent at all; jobs are discarded
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpponent;

impl Opponent for NoOpponent {
    fn request(&mut self, _job: BotJob) {}

    fn poll(&mut self) -> Option<BotReply> {
        None
    }
}
