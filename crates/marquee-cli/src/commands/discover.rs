use anyhow::Result;
use marquee_application::ExplorerUseCase;
use marquee_core::discovery::DiscoverySnapshot;

use crate::app::App;
use crate::render;

pub async fn trending(app: &App, pages: u32) -> Result<()> {
    let explorer = app.explorer()?;
    let first = explorer.on_reset_requested().await;
    let snapshot = load_more(&explorer, first, pages).await;
    show(app, &snapshot).await;
    Ok(())
}

pub async fn search(app: &App, query: &str, pages: u32) -> Result<()> {
    let explorer = app.explorer()?;
    let first = explorer.on_query_changed(query).await;
    let snapshot = load_more(&explorer, first, pages).await;
    show(app, &snapshot).await;
    Ok(())
}

pub async fn detail(app: &App, id: u64) -> Result<()> {
    let explorer = app.explorer()?;
    let item = explorer.on_item_opened(id).await?;
    render::detail(&item);
    if app.session().is_favorite(id).await {
        println!("\n♥ In your favorites");
    }
    Ok(())
}

/// Requests up to `pages - 1` further pages, stopping early on the last
/// page or on failure.
async fn load_more(
    explorer: &ExplorerUseCase,
    mut snapshot: DiscoverySnapshot,
    pages: u32,
) -> DiscoverySnapshot {
    for _ in 1..pages {
        if !snapshot.has_more() || snapshot.status.is_failed() {
            break;
        }
        snapshot = explorer.on_load_more_requested().await;
    }
    snapshot
}

async fn show(app: &App, snapshot: &DiscoverySnapshot) {
    let favorites = app.session().favorites().await;
    render::results(snapshot, |id| favorites.contains(id));
}
