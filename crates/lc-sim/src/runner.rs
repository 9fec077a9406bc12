//! The RUN phase: sample → augment → simulate for every segment.

use lc_choice::{ChoiceRecord, DestinationSampler, DestinationSimulator, LogsumAugmenter};
use lc_shadow::ShadowPriceCalculator;

use crate::{LocationModel, ModelContext, SegmentPlan, SimResult};

/// Run one iteration over all segments and return their choices
/// concatenated in segment order.
///
/// With the `parallel` Cargo feature segments run on the context's Rayon
/// pool.  Each reads the shadow-price state immutably and a disjoint set of
/// choosers, so the output is identical either way.
pub fn run_iteration(
    ctx:       &ModelContext,
    model:     &LocationModel,
    plans:     &[SegmentPlan],
    choosers:  &[Vec<usize>],
    shadow:    &ShadowPriceCalculator,
    iteration: u32,
) -> SimResult<Vec<ChoiceRecord>> {
    #[cfg(not(feature = "parallel"))]
    let per_segment: Vec<SimResult<Vec<ChoiceRecord>>> = plans
        .iter()
        .zip(choosers)
        .map(|(plan, rows)| run_segment(ctx, model, plan, rows, shadow, iteration))
        .collect();

    #[cfg(feature = "parallel")]
    let per_segment: Vec<SimResult<Vec<ChoiceRecord>>> = {
        use rayon::prelude::*;

        ctx.install(|| {
            plans
                .par_iter()
                .zip(choosers.par_iter())
                .map(|(plan, rows)| run_segment(ctx, model, plan, rows, shadow, iteration))
                .collect()
        })
    };

    let mut choices = Vec::with_capacity(choosers.iter().map(Vec::len).sum());
    for result in per_segment {
        choices.extend(result?);
    }
    Ok(choices)
}

/// Sample, augment and simulate one segment.  The sample table is dropped
/// before returning.
pub fn run_segment(
    ctx:       &ModelContext,
    model:     &LocationModel,
    plan:      &SegmentPlan,
    choosers:  &[usize],
    shadow:    &ShadowPriceCalculator,
    iteration: u32,
) -> SimResult<Vec<ChoiceRecord>> {
    let segment = &plan.segment;
    if choosers.is_empty() {
        log::info!("{} i{iteration}: no choosers in segment {}, skipping", model.name(), segment.name);
        return Ok(Vec::new());
    }

    let trace = format!("{}.i{iteration}", model.name());
    let sample_label = format!("{trace}.sample.{}", segment.name);
    let logsum_label = format!("{trace}.logsums.{}", segment.name);
    let simulate_label = format!("{trace}.simulate.{}", segment.name);

    let sizes = shadow.adjusted_sizes(segment.id);
    let chunk_size = ctx.config.chunk_size;

    let mut sample = DestinationSampler::new(
        ctx.evaluator(),
        &plan.sample_spec,
        model.settings().sample_size,
        ctx.streams(),
        &sample_label,
    )
    .with_chunk_size(chunk_size)
    .sample(choosers, sizes, ctx.eval_context())?;

    LogsumAugmenter::new(model.logsum(), ctx.evaluator(), &plan.purpose, &logsum_label)
        .with_chunk_size(chunk_size)
        .augment(&mut sample, ctx.eval_context())?;

    let choices = DestinationSimulator::new(ctx.evaluator(), &plan.spec, ctx.streams(), &simulate_label)
        .with_chunk_size(chunk_size)
        .simulate(choosers, &sample, sizes, segment.id, ctx.eval_context())?;

    log::debug!(
        "{simulate_label}: {} choosers, {} sample rows",
        choosers.len(),
        sample.len()
    );
    Ok(choices)
}
