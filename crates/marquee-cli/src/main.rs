use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - browse trending and searched movies, keep favorites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show this week's trending movies
    Trending {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Search movies by title
    Search {
        query: String,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show details (overview, genres, cast, trailer) for a movie
    Detail { id: u64 },
    /// Log in as a local user
    Login { username: String, password: String },
    /// Log out the current user
    Logout,
    /// Show the current user
    Whoami,
    /// Manage favorites of the current user
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Show recent searches of the current user
    Recent,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    List,
    /// Add a movie by id
    Add { id: u64 },
    /// Remove a movie by id
    Remove { id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = app::App::bootstrap().await?;

    match cli.command {
        Commands::Trending { pages } => commands::discover::trending(&app, pages).await?,
        Commands::Search { query, pages } => commands::discover::search(&app, &query, pages).await?,
        Commands::Detail { id } => commands::discover::detail(&app, id).await?,
        Commands::Login { username, password } => {
            commands::account::login(&app, &username, &password).await?
        }
        Commands::Logout => commands::account::logout(&app).await,
        Commands::Whoami => commands::account::whoami(&app).await,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(&app).await,
            FavoritesAction::Add { id } => commands::favorites::add(&app, id).await?,
            FavoritesAction::Remove { id } => commands::favorites::remove(&app, id).await,
        },
        Commands::Recent => commands::account::recent(&app).await,
    }

    Ok(())
}
