use anyhow::Result;
use colored::Colorize;

use crate::app::App;

pub async fn login(app: &App, username: &str, password: &str) -> Result<()> {
    let identity = app.session().login(username, password).await?;
    println!("{}", format!("Logged in as {}", identity).green());
    Ok(())
}

pub async fn logout(app: &App) {
    match app.session().current_identity().await {
        Some(identity) => {
            app.session().logout().await;
            println!("Logged out {}", identity);
        }
        None => println!("Not logged in"),
    }
}

pub async fn whoami(app: &App) {
    match app.session().current_identity().await {
        Some(identity) => println!("{}", identity),
        None => println!("{}", "anonymous".dimmed()),
    }
}

pub async fn recent(app: &App) {
    let recent = app.session().recent_searches().await;
    if recent.is_empty() {
        println!("{}", "No recent searches".dimmed());
        return;
    }
    for (index, query) in recent.queries().iter().enumerate() {
        println!("{}. {}", index + 1, query);
    }
}
