use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::error::GenerateError;
use super::plan::TripPlan;
use crate::playback::Playback;
use crate::route::RouteProvider;
use crate::track::TrackAssembler;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub completed: usize,
    /// Trips with no route; their empty shells are still stored.
    pub empty: usize,
    pub failed: usize,
}

enum Outcome {
    Completed,
    Empty,
}

/// Assembles and plays every plan, running at most `concurrency` at once.
///
/// A failing trip is logged and counted; it never stops the batch.
pub async fn generate<P, B>(
    assembler: Arc<TrackAssembler<P>>,
    playback: Arc<B>,
    plans: Vec<TripPlan>,
    concurrency: usize,
) -> GenerationSummary
where
    P: RouteProvider + 'static,
    B: Playback + 'static,
{
    let total = plans.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, plan) in plans.into_iter().enumerate() {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let assembler = assembler.clone();
        let playback = playback.clone();

        tasks.spawn(async move {
            let _permit = permit;
            let vehicle = plan.vehicle;
            let result = run_plan(&assembler, playback.as_ref(), plan).await;
            (index, vehicle, result)
        });
    }

    let mut summary = GenerationSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, _, Ok(Outcome::Completed))) => summary.completed += 1,
            Ok((index, vehicle, Ok(Outcome::Empty))) => {
                log::warn!("Trip {} for vehicle {}: no route found", index, vehicle);
                summary.empty += 1;
            }
            Ok((index, vehicle, Err(e))) => {
                log::error!("Trip {} for vehicle {} failed: {}", index, vehicle, e);
                summary.failed += 1;
            }
            Err(e) => {
                log::error!("Generation worker panicked: {}", e);
                summary.failed += 1;
            }
        }
    }

    log::info!(
        "Generated {} trips: {} completed, {} empty, {} failed",
        total,
        summary.completed,
        summary.empty,
        summary.failed
    );
    summary
}

async fn run_plan<P, B>(
    assembler: &TrackAssembler<P>,
    playback: &B,
    plan: TripPlan,
) -> Result<Outcome, GenerateError>
where
    P: RouteProvider,
    B: Playback,
{
    let track = assembler
        .assemble(plan.vehicle, &plan.request, plan.started_at)
        .await?;
    let outcome = if track.is_empty() {
        Outcome::Empty
    } else {
        Outcome::Completed
    };
    playback.play(track).await?;
    Ok(outcome)
}
