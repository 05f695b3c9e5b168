use colored::Colorize;
use marquee_core::catalog::Item;
use marquee_core::discovery::{DiscoverySnapshot, DiscoveryStatus};

pub fn item_line(item: &Item, favorite: bool) -> String {
    let marker = if favorite { "♥".red().to_string() } else { " ".to_string() };
    let title = if item.title.is_empty() {
        marquee_core::catalog::UNAVAILABLE
    } else {
        item.title.as_str()
    };
    format!(
        "{} {:>8}  {} ({})  {}",
        marker,
        item.id.to_string().dimmed(),
        title.bold(),
        item.release_year(),
        format!("★ {}", item.rating_label()).yellow()
    )
}

pub fn results(snapshot: &DiscoverySnapshot, is_favorite: impl Fn(u64) -> bool) {
    let heading = match snapshot.mode.query() {
        Some(query) => format!("Results for \"{}\"", query),
        None => "Trending this week".to_string(),
    };
    println!("{}", heading.bright_magenta().bold());

    for item in &snapshot.items {
        println!("{}", item_line(item, is_favorite(item.id)));
    }

    println!(
        "{}",
        format!(
            "{} items, page {} of {}",
            snapshot.items.len(),
            snapshot.page,
            snapshot.total_pages
        )
        .dimmed()
    );

    if let DiscoveryStatus::Failed { reason, retryable } = &snapshot.status {
        let hint = if *retryable { " (try again)" } else { "" };
        eprintln!("{}", format!("Failed: {}{}", reason, hint).red());
    }
}

pub fn detail(item: &Item) {
    println!("{}", item.title.bold());
    println!(
        "{}  {}",
        item.release_year(),
        format!("★ {}", item.rating_label()).yellow()
    );
    if let Some(url) = item.poster_url("w500") {
        println!("{}", url.dimmed());
    }

    let Some(detail) = &item.detail else {
        return;
    };
    println!();
    println!("{}", detail.overview_text());
    if !detail.genres.is_empty() {
        println!("{} {}", "Genres:".cyan(), detail.genres.join(", "));
    }
    if !detail.cast.is_empty() {
        println!("{}", "Cast:".cyan());
        for member in &detail.cast {
            match &member.character {
                Some(character) => println!("  {} as {}", member.name, character),
                None => println!("  {}", member.name),
            }
        }
    }
    match detail.trailer.as_ref().and_then(|trailer| trailer.url()) {
        Some(url) => println!("{} {}", "Trailer:".cyan(), url),
        None => println!("{} {}", "Trailer:".cyan(), marquee_core::catalog::UNAVAILABLE),
    }
}
