//! Domain review and blacklist commands.

use anyhow::{Context, Result};
use log::info;

use super::context::AppContext;
use crate::config::{BlacklistAction, KeywordAction};
use crate::domain::{build_domain_groups, root_domain_key, GroupSort, GroupingContext};
use crate::models::{DomainGroup, NewBlacklistEntry};
use crate::utils::format_date;

/// Prints the grouped domains of a run.
pub async fn show_domains(
    ctx: &AppContext,
    run_id: &str,
    sort: GroupSort,
    json: bool,
) -> Result<()> {
    let (bundle, blacklist, suppliers) = tokio::try_join!(
        ctx.api.fetch_run_bundle(run_id),
        ctx.blacklist(),
        ctx.suppliers()
    )
    .with_context(|| format!("Failed to load run {run_id}"))?;

    let grouping = GroupingContext {
        blacklist: &blacklist,
        suppliers: &suppliers,
        logs: bundle.logs.as_ref(),
        sort,
    };
    let groups = build_domain_groups(&bundle.queue, &grouping);
    info!(
        "Run {}: {} URLs in {} domains after blacklist",
        run_id,
        bundle.queue.len(),
        groups.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    println!(
        "Run {} \"{}\" ({}, started {})",
        bundle.run.run_id,
        bundle.run.keyword,
        bundle.run.status,
        format_date(&bundle.run.created_at)
    );
    for group in &groups {
        println!("{}", group_line(group));
    }
    Ok(())
}

fn group_line(group: &DomainGroup) -> String {
    let sources = group
        .sources
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let supplier = match (group.supplier_id, group.supplier_type) {
        (Some(id), Some(kind)) => format!("{kind} #{id}"),
        (Some(id), None) => format!("#{id}"),
        _ => "-".to_string(),
    };
    format!(
        "{:<40} {:>5}  {:<13} {}",
        group.domain,
        group.total_urls,
        if sources.is_empty() { "-" } else { sources.as_str() },
        supplier
    )
}

pub async fn blacklist(ctx: &AppContext, action: BlacklistAction) -> Result<()> {
    match action {
        BlacklistAction::List => {
            for entry in ctx.blacklist().await? {
                println!(
                    "{:<40} {}",
                    entry.domain,
                    entry.reason.as_deref().unwrap_or("-")
                );
            }
        }
        BlacklistAction::Add {
            domain,
            reason,
            run_id,
        } => {
            let root = root_domain_key(&domain);
            let entry = NewBlacklistEntry {
                domain: root.clone(),
                reason,
                added_by: None,
                parsing_run_id: run_id,
            };
            ctx.api
                .add_to_blacklist(&entry)
                .await
                .with_context(|| format!("Failed to blacklist {root}"))?;
            ctx.cache.invalidate_blacklist();
            println!("Blacklisted {root}");
        }
        BlacklistAction::Remove { domain } => {
            let root = root_domain_key(&domain);
            ctx.api
                .remove_from_blacklist(&root)
                .await
                .with_context(|| format!("Failed to remove {root} from the blacklist"))?;
            ctx.cache.invalidate_blacklist();
            println!("Removed {root} from the blacklist");
        }
    }
    Ok(())
}

pub async fn keywords(ctx: &AppContext, action: KeywordAction) -> Result<()> {
    match action {
        KeywordAction::List => {
            let keywords = ctx.api.list_keywords().await.context("Failed to load keywords")?;
            for keyword in keywords {
                println!("{:>6}  {}", keyword.id, keyword.keyword);
            }
        }
        KeywordAction::Add { keyword } => {
            let keyword = keyword.trim();
            let saved = ctx
                .api
                .add_keyword(keyword)
                .await
                .with_context(|| format!("Failed to save keyword \"{keyword}\""))?;
            println!("Saved keyword #{} \"{}\"", saved.id, saved.keyword);
        }
        KeywordAction::Remove { id } => {
            ctx.api
                .delete_keyword(id)
                .await
                .with_context(|| format!("Failed to delete keyword #{id}"))?;
            println!("Deleted keyword #{id}");
        }
    }
    Ok(())
}
