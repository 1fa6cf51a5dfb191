use clap::{Parser, Subcommand};

use movie_explorer::client::{ExplorerSession, MovieSource};
use movie_explorer::config::Config;
use movie_explorer::favorites::Rating;
use movie_explorer::logging::{self, LogOptions};
use movie_explorer::render;

#[derive(Parser, Debug)]
#[command(name = "movie-explorer")]
#[command(about = "Search movies and keep a list of favorites", long_about = None)]
struct Args {
    /// YAML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,
    #[arg(long)]
    debug: bool,
    #[arg(long)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the metadata proxy
    Serve,
    /// Search for movies by title
    Search { query: Vec<String> },
    /// Show details for one movie
    Show { id: i64 },
    /// Manage favorites
    #[command(subcommand)]
    Favorites(FavoritesCommand),
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    List,
    Add { id: i64 },
    Remove { id: i64 },
    Toggle { id: i64 },
    Rate { id: i64, rating: u8 },
    Unrate { id: i64 },
    Note { id: i64, text: Vec<String> },
    Unnote { id: i64 },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(LogOptions {
        debug: args.debug,
        json: args.json_logs,
    });

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Command::Serve = args.command {
        if let Err(e) = movie_explorer::run(config).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let mut session = match movie_explorer::open_session(&config).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    run_command(args.command, &mut session, &config).await;
}

async fn run_command<S: MovieSource>(command: Command, session: &mut ExplorerSession<S>, config: &Config) {
    let images = &config.images;
    match command {
        Command::Serve => {}
        Command::Search { query } => {
            session.search(&query.join(" ")).await;
            match session.search_state().await {
                Some(state) => print!("{}", render::render_search(&state, session.favorites(), images)),
                None => println!("Enter a movie title to search"),
            }
        }
        Command::Show { id } => {
            session.open_details(id).await;
            if let Some(state) = session.detail_state().await {
                print!("{}", render::render_details(&state, session.is_favorite(id), images));
            }
        }
        Command::Favorites(command) => run_favorites(command, session, config).await,
    }
}

async fn run_favorites<S: MovieSource>(
    command: FavoritesCommand,
    session: &mut ExplorerSession<S>,
    config: &Config,
) {
    let images = &config.images;
    let outcome = match command {
        FavoritesCommand::List => {
            print!("{}", render::render_favorites(session.favorites(), images));
            return;
        }
        FavoritesCommand::Add { id } => session.add_favorite_by_id(id).await.map(|added| {
            if added {
                format!("Added {} to favorites", id)
            } else {
                format!("{} is already a favorite", id)
            }
        }),
        FavoritesCommand::Remove { id } => Ok(if session.remove_favorite(id).await {
            format!("Removed {} from favorites", id)
        } else {
            format!("{} is not a favorite", id)
        }),
        FavoritesCommand::Toggle { id } => {
            if session.remove_favorite(id).await {
                Ok(format!("Removed {} from favorites", id))
            } else {
                session
                    .add_favorite_by_id(id)
                    .await
                    .map(|_| format!("Added {} to favorites", id))
            }
        }
        FavoritesCommand::Rate { id, rating } => match Rating::new(rating) {
            Ok(rating) => session
                .rate(id, Some(rating))
                .await
                .map(|r| format!("Rated {}: {} - {}", r.movie.title, rating.value(), rating.label())),
            Err(e) => Err(e.into()),
        },
        FavoritesCommand::Unrate { id } => session
            .rate(id, None)
            .await
            .map(|r| format!("Cleared rating for {}", r.movie.title)),
        FavoritesCommand::Note { id, text } => session
            .annotate(id, Some(text.join(" ")))
            .await
            .map(|r| format!("Saved note for {}", r.movie.title)),
        FavoritesCommand::Unnote { id } => session
            .annotate(id, None)
            .await
            .map(|r| format!("Cleared note for {}", r.movie.title)),
    };

    match outcome {
        Ok(message) => println!("{}", message),
        Err(e) => eprintln!("{}", e),
    }
}
