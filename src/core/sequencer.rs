//! 節日查詢的排隊執行器
//!
//! 呼叫端可以同時送出查詢，但所有快取讀寫與外部資料來源的呼叫都只在
//! 單一 worker 上依照送出順序執行。佇列本身就是鎖：快取不需要任何同步。

use crate::core::cache::HolidayCache;
use crate::core::selector::TravelWindowSelector;
use crate::domain::model::{HolidayQuery, Period, TravelWindow};
use crate::domain::ports::HolidayGateway;
use crate::utils::error::{CrawlError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, OwnedSemaphorePermit, Semaphore};

pub const DEFAULT_QUEUE_CAPACITY: usize = 200;

type Reply = Result<Vec<TravelWindow>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
}

struct Task {
    id: u64,
    query: HolidayQuery,
    state: TaskState,
    reply: oneshot::Sender<Reply>,
    // 佇列名額在任務完成（Task 被丟棄）時才釋放
    slot: OwnedSemaphorePermit,
}

impl Task {
    fn transition(&mut self, next: TaskState) {
        tracing::trace!(task_id = self.id, from = ?self.state, to = ?next, "task state change");
        self.state = next;
    }
}

/// 等待單一查詢結果的 handle
#[derive(Debug)]
pub struct TaskHandle {
    id: u64,
    period: Period,
    rx: oneshot::Receiver<Reply>,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// 等待 worker 完成此任務；放棄等待不會把任務移出佇列
    pub async fn wait(self) -> Result<Vec<TravelWindow>> {
        self.rx.await.map_err(|_| CrawlError::SequencerClosed)?
    }
}

/// 有界 FIFO 佇列 + 單一 worker
#[derive(Clone)]
pub struct RequestSequencer {
    tx: mpsc::UnboundedSender<Task>,
    slots: Arc<Semaphore>,
    capacity: usize,
    next_id: Arc<AtomicU64>,
}

impl RequestSequencer {
    /// 啟動 worker，必須在 Tokio runtime 內呼叫
    pub fn spawn<G>(gateway: G, selector: TravelWindowSelector, capacity: usize) -> Self
    where
        G: HolidayGateway + 'static,
    {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = SequencerWorker {
            gateway,
            selector,
            cache: HolidayCache::new(),
            rx,
        };
        tokio::spawn(worker.run());

        tracing::debug!(capacity, "holiday request sequencer started");

        Self {
            tx,
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// 送出查詢；佇列已滿時立即回傳 `QueueFull`，不會阻塞
    pub fn submit(&self, query: HolidayQuery) -> Result<TaskHandle> {
        let slot = match Arc::clone(&self.slots).try_acquire_owned() {
            Ok(slot) => slot,
            Err(_) => {
                tracing::warn!(
                    period = %query.period,
                    capacity = self.capacity,
                    "holiday request rejected, queue is full"
                );
                return Err(CrawlError::QueueFull {
                    capacity: self.capacity,
                });
            }
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let period = query.period;
        let (reply, rx) = oneshot::channel();
        let task = Task {
            id,
            query,
            state: TaskState::Pending,
            reply,
            slot,
        };

        self.tx
            .send(task)
            .map_err(|_| CrawlError::SequencerClosed)?;

        tracing::debug!(task_id = id, %period, queued = self.queued(), "holiday request queued");
        Ok(TaskHandle { id, period, rx })
    }

    /// 尚未完成的任務數（含執行中的那一筆）
    pub fn queued(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }
}

struct SequencerWorker<G> {
    gateway: G,
    selector: TravelWindowSelector,
    cache: HolidayCache,
    rx: mpsc::UnboundedReceiver<Task>,
}

impl<G: HolidayGateway> SequencerWorker<G> {
    async fn run(mut self) {
        while let Some(mut task) = self.rx.recv().await {
            task.transition(TaskState::Running);
            let result = self.process(&task.query).await;

            match &result {
                Ok(windows) => tracing::info!(
                    task_id = task.id,
                    period = %task.query.period,
                    windows = windows.len(),
                    "holiday request completed"
                ),
                Err(e) => tracing::error!(
                    task_id = task.id,
                    period = %task.query.period,
                    error = %e,
                    "holiday request failed"
                ),
            }

            task.transition(TaskState::Completed);
            let Task { id, reply, slot, .. } = task;
            // 先釋放名額再回覆，呼叫端拿到結果時佇列已有空位
            drop(slot);
            if reply.send(result).is_err() {
                tracing::debug!(task_id = id, "caller stopped waiting, result dropped");
            }
        }

        tracing::debug!("holiday request sequencer stopped");
    }

    async fn process(&mut self, query: &HolidayQuery) -> Result<Vec<TravelWindow>> {
        let period = query.period;

        if !self.cache.contains(&period) {
            tracing::info!(year = period.year, month = period.month, "cache miss, fetching holidays");
            // 失敗時不寫入快取，下一次查詢會重試
            let records = self.gateway.fetch_year(period.year).await?;
            tracing::debug!(year = period.year, records = records.len(), "holiday year fetched");
            self.cache.put_year(period.year, records);
        } else {
            tracing::debug!(year = period.year, month = period.month, "cache hit");
        }

        let records = self.cache.get(&period).unwrap_or_default();
        Ok(self.selector.select(period, records, &query.blocked))
    }
}
