//! Commands that start and observe backend jobs.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use super::context::AppContext;
use crate::api::DomainQueueQuery;
use crate::autosave::SupplierAutoSaver;
use crate::domain::{build_domain_groups, root_domain_key, GroupingContext};
use crate::models::{
    ExtractionKind, ExtractionResult, ParsingRun, SearchSource, StartExtraction, StartParsing,
};
use crate::polling::{JobPoller, JobReport, JobState, PollHandle, PollUpdate};
use crate::utils::format_date;

pub async fn parse(
    ctx: &AppContext,
    keyword: String,
    depth: Option<u32>,
    source: Option<SearchSource>,
    wait: bool,
) -> Result<()> {
    let request = StartParsing {
        keyword,
        depth,
        source,
    };
    let run = ctx
        .api
        .start_parsing(&request)
        .await
        .with_context(|| format!("Failed to start parsing for \"{}\"", request.keyword))?;
    println!("Started run {} for \"{}\"", run.run_id, run.keyword);
    if !wait {
        return Ok(());
    }

    let api = ctx.api.clone();
    let run_id = run.run_id.clone();
    let mut handle = JobPoller::new(format!("run {run_id}")).start(move || {
        let api = api.clone();
        let run_id = run_id.clone();
        async move { api.get_run(&run_id).await }
    });

    let update = watch_until_done(&mut handle, |_| {}).await;
    match update.state {
        JobState::Completed => {
            let results = update.report.and_then(|r| r.results_count).unwrap_or(0);
            println!("Run {} completed with {} results", run.run_id, results);
            Ok(())
        }
        JobState::Failed(reason) => bail!(reason),
        state => bail!("Run {} interrupted while {}", run.run_id, state),
    }
}

pub async fn list_runs(ctx: &AppContext, limit: Option<u32>) -> Result<()> {
    let runs = ctx
        .api
        .list_runs(limit)
        .await
        .context("Failed to load parsing runs")?;
    for run in &runs {
        println!("{}", run_line(run));
    }
    Ok(())
}

fn run_line(run: &ParsingRun) -> String {
    let results = run
        .results_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<12} {:<10} {:>6}  {:<10}  {}",
        run.run_id,
        run.status.to_string(),
        results,
        format_date(&run.created_at),
        run.keyword
    )
}

pub async fn extract(
    ctx: &AppContext,
    kind: ExtractionKind,
    run_id: &str,
    autosave: bool,
    restart: bool,
) -> Result<()> {
    let mut results = ctx.cache.get_extraction_results(kind, run_id);

    let resumed = match ctx.cache.get_extraction_job(kind, run_id) {
        Some(job_id) if !restart => resumable_job(ctx, kind, run_id, job_id).await,
        _ => None,
    };
    let job_id = match resumed {
        Some(job_id) => job_id,
        None => {
            let domains = pending_domains(ctx, run_id, &results).await?;
            if domains.is_empty() {
                println!("No domains left to process for run {run_id}");
                return finish(ctx, kind, run_id, &results, autosave).await;
            }
            let request = StartExtraction {
                run_id: run_id.to_string(),
                domains,
            };
            let started = ctx
                .api
                .start_extraction(kind, &request)
                .await
                .with_context(|| format!("Failed to start {kind} extraction for run {run_id}"))?;
            info!(
                "Started {} job {} over {} domains",
                kind,
                started.job_id,
                request.domains.len()
            );
            if let Err(e) = ctx.cache.set_extraction_job(kind, run_id, &started.job_id) {
                warn!("Job id not cached, it cannot be resumed: {}", e);
            }
            started.job_id
        }
    };

    let api = ctx.api.clone();
    let id = job_id.clone();
    let mut handle = JobPoller::new(format!("{kind} job {job_id}")).start(move || {
        let api = api.clone();
        let id = id.clone();
        async move { api.extraction_status(kind, &id).await }
    });

    let update = watch_until_done(&mut handle, |update| {
        if let Some(job) = &update.report {
            merge_results(&mut results, &job.results);
            if let Err(e) = ctx.cache.set_extraction_results(kind, run_id, &results) {
                warn!("Extraction results not cached: {}", e);
            }
        }
    })
    .await;

    match update.state {
        JobState::Completed => {
            ctx.cache.clear_extraction_job(kind, run_id);
            println!("{} job {} completed: {} domains", kind, job_id, results.len());
            finish(ctx, kind, run_id, &results, autosave).await
        }
        JobState::Failed(reason) => {
            ctx.cache.clear_extraction_job(kind, run_id);
            bail!("{kind} job {job_id} failed: {reason}")
        }
        state => {
            println!("Stopped while {state}; run the command again to resume job {job_id}");
            Ok(())
        }
    }
}

/// The cached job id, unless the backend no longer knows the job.
///
/// A forgotten job is dropped from the cache so a new one gets started.
/// Other status errors still resume; the poller retries them.
async fn resumable_job(
    ctx: &AppContext,
    kind: ExtractionKind,
    run_id: &str,
    job_id: String,
) -> Option<String> {
    match ctx.api.extraction_status(kind, &job_id).await {
        Err(e) if e.is_not_found() => {
            warn!("{} job {} is unknown to the backend, starting a new one", kind, job_id);
            ctx.cache.clear_extraction_job(kind, run_id);
            None
        }
        _ => {
            info!("Resuming {} job {} for run {}", kind, job_id, run_id);
            Some(job_id)
        }
    }
}

/// Root domains of the run that pass the blacklist and have no result yet.
async fn pending_domains(
    ctx: &AppContext,
    run_id: &str,
    done: &BTreeMap<String, ExtractionResult>,
) -> Result<Vec<String>> {
    let query = DomainQueueQuery::for_run(run_id);
    let (queue, blacklist) = tokio::try_join!(ctx.api.domain_queue(&query), ctx.blacklist())
    .with_context(|| format!("Failed to load domains of run {run_id}"))?;

    let grouping = GroupingContext {
        blacklist: &blacklist,
        suppliers: &[],
        logs: None,
        sort: Default::default(),
    };
    Ok(build_domain_groups(&queue, &grouping)
        .into_iter()
        .map(|g| root_domain_key(&g.domain))
        .filter(|d| !done.contains_key(d))
        .collect())
}

fn merge_results(into: &mut BTreeMap<String, ExtractionResult>, results: &[ExtractionResult]) {
    for result in results {
        into.insert(root_domain_key(&result.domain), result.clone());
    }
}

async fn finish(
    ctx: &AppContext,
    kind: ExtractionKind,
    run_id: &str,
    results: &BTreeMap<String, ExtractionResult>,
    autosave: bool,
) -> Result<()> {
    let found = results
        .values()
        .filter(|r| r.is_success() && r.inn.is_some())
        .count();
    println!("{kind}: {found} of {} domains with an INN", results.len());

    if !autosave {
        return Ok(());
    }

    let checko = match ctx.checko() {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Registry enrichment disabled: {}", e);
            None
        }
    };
    let suppliers = ctx.suppliers().await.context("Failed to load suppliers")?;
    let outcome = SupplierAutoSaver::new()
        .run(&ctx.api, checko.as_ref(), results, &suppliers)
        .await;
    if !outcome.is_noop() {
        ctx.cache.invalidate_suppliers();
    }
    println!(
        "Suppliers for run {}: {} created, {} updated, {} enriched, {} skipped, {} failed",
        run_id, outcome.created, outcome.updated, outcome.enriched, outcome.skipped, outcome.failed
    );
    Ok(())
}

/// Follows a poller until the job ends or Ctrl-C is pressed.
///
/// `on_update` sees every published update, including the last one.
async fn watch_until_done<R, F>(handle: &mut PollHandle<R>, mut on_update: F) -> PollUpdate<R>
where
    R: JobReport + Clone,
    F: FnMut(&PollUpdate<R>),
{
    loop {
        tokio::select! {
            changed = handle.changed() => {
                let Some(update) = changed else {
                    return handle.latest();
                };
                on_update(&update);
                if update.state.is_terminal() {
                    return update;
                }
                info!("{}", update.state);
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, stopping the poller");
                handle.cancel();
                return handle.latest();
            }
        }
    }
}
