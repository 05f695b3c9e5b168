use anyhow::{Result, bail};
use colored::Colorize;

use crate::app::App;
use crate::render;

pub async fn list(app: &App) {
    if app.session().current_identity().await.is_none() {
        println!("{}", "Log in to keep favorites".dimmed());
        return;
    }
    let favorites = app.session().favorites().await;
    if favorites.is_empty() {
        println!("{}", "No favorites yet".dimmed());
        return;
    }
    for item in favorites.items() {
        println!("{}", render::item_line(item, true));
    }
}

pub async fn add(app: &App, id: u64) -> Result<()> {
    if app.session().current_identity().await.is_none() {
        bail!("Log in to keep favorites");
    }
    let explorer = app.explorer()?;
    let mut item = explorer.on_item_opened(id).await?;
    // Favorites store the list shape only.
    item.detail = None;
    let title = item.title.clone();
    if app.session().add_favorite(item).await {
        println!("{}", format!("Added {}", title).green());
    } else {
        println!("{} is already a favorite", title);
    }
    Ok(())
}

pub async fn remove(app: &App, id: u64) {
    if app.session().remove_favorite(id).await {
        println!("Removed {}", id);
    } else {
        println!("{} is not a favorite", id);
    }
}
