//! Text and JSON rendering for command output.

use serde::Serialize;

use sole_core::{format_price, Sneaker, SneakerSearchResult, UserProfile, PRICE_UNAVAILABLE};
use sole_kicks::SourceFailure;

const NAME_WIDTH: usize = 48;

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn results_table(rows: &[SneakerSearchResult]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<8}{:<10}{:<width$}  STYLE ID",
        "SOURCE",
        "PRICE",
        "NAME",
        width = NAME_WIDTH
    )];
    for row in rows {
        lines.push(format!(
            "{:<8}{:<10}{:<width$}  {}",
            row.source.as_str(),
            row.display_price,
            truncate(&row.shoe_name, NAME_WIDTH),
            row.style_id,
            width = NAME_WIDTH
        ));
    }
    lines
}

pub(crate) fn print_results(title: &str, rows: &[SneakerSearchResult]) {
    if rows.is_empty() {
        println!("{title}: no results");
        return;
    }
    println!("{title} ({})", rows.len());
    for line in results_table(rows) {
        println!("{line}");
    }
}

pub(crate) fn print_failures(failures: &[SourceFailure]) {
    for failure in failures {
        let status = failure
            .status
            .map_or_else(|| "no status".to_string(), |s| s.to_string());
        eprintln!("warning: {} failed ({status}): {}", failure.source, failure.message);
    }
}

pub(crate) fn sneaker_lines(sneaker: &Sneaker) -> Vec<String> {
    let opt = |v: Option<&str>| v.unwrap_or(PRICE_UNAVAILABLE).to_string();
    let mut lines = vec![
        format!("{} ({})", sneaker.shoe_name, sneaker.source),
        format!("Style ID:     {}", sneaker.style_id),
        format!("Brand:        {}", opt(sneaker.brand.as_deref())),
        format!("Colorway:     {}", opt(sneaker.colorway.as_deref())),
        format!("Release date: {}", opt(sneaker.release_date.as_deref())),
        format!("Retail:       {}", format_price(sneaker.retail_price)),
        format!(
            "Lowest ask:   StockX {} / GOAT {}",
            format_price(sneaker.lowest_resell_price.stock_x),
            format_price(sneaker.lowest_resell_price.goat)
        ),
    ];
    if !sneaker.resell_prices.is_empty() {
        lines.push("Sizes:".to_string());
        for size in sneaker.resell_prices.keys() {
            lines.push(format!(
                "  {size:<8}{}",
                format_price(sneaker.price_for_size(size))
            ));
        }
    }
    lines
}

pub(crate) fn print_sneaker(sneaker: &Sneaker) {
    for line in sneaker_lines(sneaker) {
        println!("{line}");
    }
}

pub(crate) fn print_profile(profile: &UserProfile) {
    println!("{} ({})", profile.username, profile.id);
    println!(
        "Shoe size: {}",
        profile.shoe_size.as_deref().unwrap_or(PRICE_UNAVAILABLE)
    );
    println!("Liked:     {}", profile.liked_style_ids.len());
}
