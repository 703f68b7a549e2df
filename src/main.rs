// src/main.rs
//
// moviehub CLI: browse catalog lists and track achievements from a terminal.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};

use moviehub::application::commands::*;
use moviehub::application::dto::{LoadMoviePageDto, MoviePageDto, RecordActivityDto};
use moviehub::application::error_handling::{ErrorResponse, ErrorType};
use moviehub::application::state::AppState;
use moviehub::config::AppConfig;
use moviehub::events::AchievementUnlocked;
use moviehub::MovieListType;

#[derive(Debug, Parser)]
#[command(name = "moviehub", version, about = "Browse movie lists and track achievements")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the available list types
    Lists,
    /// Load pages of a list, e.g. `browse horror_movies --pages 3`
    Browse {
        list: String,
        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Sort key for discover lists, e.g. vote_average.desc
        #[arg(long)]
        sort: Option<String>,
    },
    /// Record an activity, e.g. `record alice decade_searched --decade 1980`
    Record {
        user: String,
        activity: String,
        #[arg(long = "genre")]
        genres: Vec<u32>,
        #[arg(long)]
        decade: Option<u16>,
        /// Trivia answer was correct
        #[arg(long, conflicts_with = "wrong")]
        correct: bool,
        /// Trivia answer was wrong
        #[arg(long)]
        wrong: bool,
        #[arg(long)]
        points: Option<u32>,
    },
    /// Show every achievement and whether the user has it
    Achievements { user: String },
}

fn command_error(error: ErrorResponse) -> anyhow::Error {
    match error.details {
        Some(details) => anyhow!("{}: {}", error.message, details),
        None => anyhow!(error.message),
    }
}

fn print_page(page: &MoviePageDto) {
    println!(
        "-- {} page {}/{} --",
        page.list_type, page.current_page, page.total_pages
    );
    for movie in &page.items {
        let year = movie
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .unwrap_or("????");
        let rating = movie
            .vote_average
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>8}  {}  {:>4}  {}", movie.id, year, rating, movie.title);
    }
}

async fn browse(state: &AppState, list: String, pages: u32, sort: Option<String>) -> anyhow::Result<()> {
    let first = load_movie_page(
        LoadMoviePageDto {
            list_type: list.clone(),
            page: Some(1),
            sort_by: sort.clone(),
        },
        state,
    )
    .await
    .map_err(command_error)?;
    print_page(&first);

    let mut can_load_more = first.can_load_more;
    for _ in 1..pages {
        if !can_load_more {
            break;
        }
        match load_next_movie_page(list.clone(), sort.clone(), state).await {
            Ok(page) => {
                can_load_more = page.can_load_more;
                print_page(&page);
            }
            Err(e) if e.error_type == ErrorType::EndOfData => break,
            Err(e) => return Err(command_error(e)),
        }
    }

    if !can_load_more {
        println!("(end of list)");
    }
    release_movie_list(list, state).await.map_err(command_error)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().map(|_| ()).or_else(|err| match err {
        dotenvy::Error::Io(_) => Ok(()),
        _ => Err(err),
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Command::Lists = cli.command {
        for list_type in MovieListType::ALL {
            println!("{}", list_type);
        }
        return Ok(());
    }

    let config = AppConfig::from_env().context("loading configuration")?;
    let state = AppState::initialize(config).context("initializing application")?;

    state.event_bus.subscribe::<AchievementUnlocked, _>(|event| {
        println!("Achievement unlocked: {}", event.achievement_name);
    });

    match cli.command {
        Command::Lists => {}
        Command::Browse { list, pages, sort } => browse(&state, list, pages, sort).await?,
        Command::Record {
            user,
            activity,
            genres,
            decade,
            correct,
            wrong,
            points,
        } => {
            let dto = RecordActivityDto {
                user_id: user,
                kind: activity,
                genre_ids: Some(genres),
                decade,
                correct: (correct || wrong).then_some(correct),
                points,
            };
            let unlocked = record_activity(dto, &state).await.map_err(command_error)?;
            if unlocked.is_empty() {
                println!("Recorded.");
            }
        }
        Command::Achievements { user } => {
            let achievements = list_achievements(user, &state)
                .await
                .map_err(command_error)?;
            for achievement in achievements {
                let mark = if achievement.unlocked { "[x]" } else { "[ ]" };
                println!(
                    "{} {:<24} {}",
                    mark, achievement.name, achievement.description
                );
            }
        }
    }

    Ok(())
}
