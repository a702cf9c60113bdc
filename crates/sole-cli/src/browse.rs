//! Marketplace browsing commands: `search`, `curated` and `detail`.

use std::sync::Arc;

use serde_json::json;

use sole_core::{AppConfig, SearchSource, SneakerSource};
use sole_kicks::{resolve_product, KicksClient, SearchOrchestrator, SearchOutcome, SearchRequest};
use sole_store::UserStore;

use crate::output;

#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub keyword: String,
    pub brand: Option<String>,
    pub source: SearchSource,
    pub limit: u32,
    pub page: u32,
    pub size: Option<String>,
    pub interleaved: bool,
}

/// An explicit size wins; otherwise the signed-in user's size is used.
async fn effective_size(store: &UserStore, size: Option<String>) -> Option<String> {
    match size {
        Some(size) => Some(size),
        None => store.current_user().await.and_then(|u| u.shoe_size),
    }
}

pub(crate) async fn run_search(
    kicks: &Arc<KicksClient>,
    store: &UserStore,
    args: SearchArgs,
    json: bool,
) -> anyhow::Result<()> {
    let size = effective_size(store, args.size).await;
    let request = SearchRequest {
        brand: args.brand,
        ..SearchRequest::keyword(args.keyword, args.source, args.limit)
    }
    .with_page(args.page)
    .with_user_size(size);

    let outcome = orchestrator(kicks).search(&request).await;
    render_outcome(&outcome, args.interleaved, json)
}

pub(crate) async fn run_curated(
    kicks: &Arc<KicksClient>,
    store: &UserStore,
    config: &AppConfig,
    source: SearchSource,
    size: Option<String>,
    interleaved: bool,
    json: bool,
) -> anyhow::Result<()> {
    let size = effective_size(store, size).await;
    let request = SearchRequest {
        source,
        ..SearchRequest::curated(config.curated_brand.clone(), config.curated_limit)
    }
    .with_user_size(size);

    let outcome = orchestrator(kicks).search(&request).await;
    render_outcome(&outcome, interleaved, json)
}

pub(crate) async fn run_detail(
    kicks: &Arc<KicksClient>,
    source: SneakerSource,
    id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let sneaker = resolve_product(kicks.as_ref(), source, id).await.map_err(|e| {
        if e.is_not_found() {
            anyhow::anyhow!("product '{id}' not found on {source}")
        } else {
            anyhow::Error::new(e).context(format!("failed to load '{id}' from {source}"))
        }
    })?;

    if json {
        output::print_json(&sneaker)
    } else {
        output::print_sneaker(&sneaker);
        Ok(())
    }
}

fn orchestrator(kicks: &Arc<KicksClient>) -> SearchOrchestrator<KicksClient> {
    SearchOrchestrator::new(Arc::clone(kicks))
}

fn render_outcome(outcome: &SearchOutcome, interleaved: bool, json: bool) -> anyhow::Result<()> {
    if outcome.all_failed() {
        output::print_failures(&outcome.failures);
        anyhow::bail!("every marketplace failed; nothing to show");
    }

    if json {
        let value = if interleaved {
            json!({ "data": outcome.interleaved(), "failures": outcome.failures })
        } else {
            json!({
                "data": { "stockx": outcome.stockx, "goat": outcome.goat },
                "failures": outcome.failures,
            })
        };
        output::print_json(&value)?;
    } else {
        if interleaved {
            output::print_results("Results", &outcome.interleaved());
        } else {
            if outcome.requested.includes(SneakerSource::Stockx) {
                output::print_results("StockX", &outcome.stockx);
            }
            if outcome.requested.includes(SneakerSource::Goat) {
                output::print_results("GOAT", &outcome.goat);
            }
        }
        output::print_failures(&outcome.failures);
    }
    Ok(())
}
