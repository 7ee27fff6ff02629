// THEORY:
// Automation loops rarely ask one question per frame. A typical tick checks a handful
// of color ranges, a purity test on a dialog area and a percentage on a health bar, all
// against the same capture. Every core operation is a pure function over a read-only
// frame, so those questions can run side by side without any locking.
//
// Key architectural principles:
// 1.  **Shared, Owned Frame**: The caller hands over an `Arc<FrameBuffer>`. Each worker
//     borrows it as a `Frame` for the duration of its query; nobody mutates it.
// 2.  **Blocking Workers**: Queries are CPU-bound, so they run on tokio's blocking pool
//     via `spawn_blocking` rather than on the async executor threads.
// 3.  **Bounded Fan-Out**: A semaphore sized from `num_cpus` caps how many queries run at
//     once, so one large batch cannot flood the blocking pool.
// 4.  **Order-Preserving**: Results come back in query order, one `Result` per query, so
//     a single bad region fails only its own slot.

use crate::core_modules::error::{Error, Result};
use crate::core_modules::frame::frame::{Frame, FrameBuffer};
use crate::pipeline::{ColorProbe, ColorRange, ProbeConfig, RectangleQuery, Region};
use futures::future::join_all;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// One question to ask of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeQuery {
    Purity,
    Colorfulness {
        #[serde(default)]
        region: Option<Region>,
    },
    Saturation {
        #[serde(default)]
        region: Option<Region>,
    },
    Rectangles {
        range: ColorRange,
        query: RectangleQuery,
        #[serde(default)]
        region: Option<Region>,
    },
    Percentage {
        range: ColorRange,
        #[serde(default)]
        region: Option<Region>,
    },
}

/// The answer to a `ProbeQuery`, tagged by the kind of question.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Purity(bool),
    Colorfulness(f64),
    Saturation(f64),
    Rectangles(Vec<Region>),
    Percentage(f64),
}

impl ProbeQuery {
    /// Runs this query synchronously against `frame`.
    pub fn evaluate(&self, probe: &ColorProbe, frame: &Frame<'_>) -> Result<ProbeOutcome> {
        Ok(match self {
            ProbeQuery::Purity => ProbeOutcome::Purity(probe.is_pure(frame)),
            ProbeQuery::Colorfulness { region } => {
                ProbeOutcome::Colorfulness(probe.colorfulness(frame, region.as_ref())?)
            }
            ProbeQuery::Saturation { region } => {
                ProbeOutcome::Saturation(probe.saturation(frame, region.as_ref())?)
            }
            ProbeQuery::Rectangles {
                range,
                query,
                region,
            } => ProbeOutcome::Rectangles(probe.find_rectangles(
                frame,
                range,
                query,
                region.as_ref(),
            )?),
            ProbeQuery::Percentage { range, region } => {
                ProbeOutcome::Percentage(probe.color_percentage(frame, range, region.as_ref()))
            }
        })
    }
}

/// Evaluates batches of probe queries concurrently against a shared frame.
pub struct ParallelPipeline {
    probe: ColorProbe,
    permits: Arc<Semaphore>,
    worker_count: usize,
}

impl ParallelPipeline {
    /// Creates a pipeline that runs up to one query per logical CPU at a time.
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_workers(config, num_cpus::get())
    }

    /// Creates a pipeline that runs at most `worker_count` queries at a time.
    pub fn with_workers(config: ProbeConfig, worker_count: usize) -> Self {
        let worker_count = worker_count.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            probe: ColorProbe::new(config),
            permits: Arc::new(Semaphore::new(worker_count)),
            worker_count,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs every query against `frame`, returning one result per query in query order.
    pub async fn run(
        &self,
        frame: Arc<FrameBuffer>,
        queries: Vec<ProbeQuery>,
    ) -> Vec<Result<ProbeOutcome>> {
        debug!(
            "frame {}: evaluating {} queries on up to {} workers",
            frame.frame_id,
            queries.len(),
            self.worker_count
        );

        let tasks = queries.into_iter().map(|query| {
            let frame = Arc::clone(&frame);
            let probe = self.probe.clone();
            let permits = Arc::clone(&self.permits);
            run_on_worker(permits, move || query.evaluate(&probe, &frame.as_frame()))
        });

        join_all(tasks).await
    }
}

/// Runs `task` on the blocking pool once a permit is free. A panic inside the task
/// surfaces as `Error::Worker`.
async fn run_on_worker<T, F>(permits: Arc<Semaphore>, task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|err| Error::Worker(err.to_string()))?;
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| Error::Worker(err.to_string()))?
}
