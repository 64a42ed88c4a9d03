//! Command-line front end: wires the client together and prints the state
//! each view model publishes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use tokio::task::JoinHandle;

use crate::api::{CatalogApi, HttpCatalogApi};
use crate::config::AppConfig;
use crate::models::{
    Album, Artist, Collector, CreateAlbumRequest, CreateTrackRequest, ValidationError,
};
use crate::profiling::{MetricsSink, Profiler};
use crate::repository::{AlbumRepository, ArtistRepository, CollectorRepository};
use crate::viewmodel::{AlbumViewModel, ArtistViewModel, CollectorViewModel};

#[derive(Debug, Parser)]
#[command(name = "vinilos", version, about = "Browse the Vinilos vinyl catalog")]
pub struct Cli {
    /// Backend root url
    #[arg(long, env = "VINILOS_BASE_URL")]
    pub base_url: Option<String>,

    /// CSV file receiving profiling rows
    #[arg(long, env = "VINILOS_METRICS")]
    pub metrics: Option<PathBuf>,

    /// Record timing and resource metrics for profiled operations
    #[arg(long)]
    pub profile: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every album
    Albums,
    /// Show one album with its tracks
    Album { id: i64 },
    /// List every artist
    Artists,
    /// Show one artist with their albums
    Artist { id: i64 },
    /// List every collector
    Collectors,
    /// Show one collector with their owned albums
    Collector { id: i64 },
    /// Create an album, optionally adding tracks to it
    CreateAlbum(CreateAlbumArgs),
}

#[derive(Debug, Args)]
pub struct CreateAlbumArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub cover: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub release_date: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub genre: String,
    #[arg(long)]
    pub record_label: Option<String>,
    /// NAME=MM:SS, repeatable
    #[arg(long = "track", value_parser = parse_track)]
    pub tracks: Vec<CreateTrackRequest>,
}

impl CreateAlbumArgs {
    fn request(&self) -> CreateAlbumRequest {
        CreateAlbumRequest {
            name: self.name.clone(),
            cover: self.cover.clone(),
            release_date: self.release_date.clone(),
            description: self.description.clone(),
            genre: self.genre.clone(),
            record_label: self.record_label.clone(),
        }
    }
}

fn parse_track(value: &str) -> Result<CreateTrackRequest, String> {
    let (name, duration) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=MM:SS, got '{value}'"))?;

    let track = CreateTrackRequest {
        name: name.trim().to_string(),
        duration: duration.trim().to_string(),
    };
    track.validate().map_err(|err| err.to_string())?;
    Ok(track)
}

/// View models built once at startup and shared by every command.
struct App {
    albums: AlbumViewModel,
    artists: ArtistViewModel,
    collectors: CollectorViewModel,
}

impl App {
    fn new(api: Arc<dyn CatalogApi>, profiler: Option<Profiler>) -> Self {
        Self {
            albums: AlbumViewModel::new(AlbumRepository::new(Arc::clone(&api)), profiler.clone()),
            artists: ArtistViewModel::new(ArtistRepository::new(Arc::clone(&api))),
            collectors: CollectorViewModel::new(CollectorRepository::new(api), profiler),
        }
    }
}

fn build_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::default();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(metrics) = &cli.metrics {
        config = config.with_metrics_path(metrics.clone());
    }
    config
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli);

    let profiler = if cli.profile {
        config.ensure_filesystem()?;
        Some(Profiler::with_host_probe(MetricsSink::new(config.metrics_path())))
    } else {
        None
    };

    let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalogApi::new(&config)?);
    let app = App::new(api, profiler);

    match cli.command {
        Command::Albums => {
            join(app.albums.load_albums()).await?;
            let state = app.albums.state();
            fail_on_error(state.error_message)?;
            for album in &state.albums {
                println!("{}", album_summary(album));
            }
        }
        Command::Album { id } => {
            join(app.albums.load_album(id)).await?;
            let state = app.albums.state();
            fail_on_error(state.error_message)?;
            if let Some(album) = &state.selected_album {
                println!("{}", album_detail(album));
            }
        }
        Command::Artists => {
            join(app.artists.load_artists()).await?;
            let state = app.artists.state();
            fail_on_error(state.error_message)?;
            for artist in &state.artists {
                println!("{:>4}  {}", artist.id, artist.name);
            }
        }
        Command::Artist { id } => {
            join(app.artists.load_artist(id)).await?;
            let state = app.artists.state();
            fail_on_error(state.error_message)?;
            if let Some(artist) = &state.selected_artist {
                println!("{}", artist_detail(artist));
            }
        }
        Command::Collectors => {
            join(app.collectors.load_collectors()).await?;
            let state = app.collectors.state();
            fail_on_error(state.error_message)?;
            for collector in &state.collectors {
                println!("{:>4}  {} <{}>", collector.id, collector.name, collector.email);
            }
        }
        Command::Collector { id } => {
            // Owned albums are only referenced by id, so the album list is
            // loaded alongside the collector to resolve their names.
            let collector_task = app.collectors.load_collector(id);
            let albums_task = app.albums.load_albums();
            join(collector_task).await?;
            join(albums_task).await?;

            let state = app.collectors.state();
            fail_on_error(state.error_message)?;
            if let Some(collector) = &state.selected_collector {
                println!("{}", collector_detail(collector, &app.albums.state().albums));
            }
        }
        Command::CreateAlbum(args) => create_album(&app, &args).await?,
    }

    Ok(())
}

async fn create_album(app: &App, args: &CreateAlbumArgs) -> Result<()> {
    let task = app.albums.create_album(args.request()).map_err(invalid_input)?;
    join(task).await?;

    let state = app.albums.state();
    let album = confirmed(state.album_created, state.selected_album, state.error_message, "album")?;
    app.albums.clear_album_created();

    // The list refresh started by the creation shares `error_message`, so
    // each track is judged by `track_added`.
    for track in &args.tracks {
        let task = app.albums.add_track(album.id, track.clone()).map_err(invalid_input)?;
        join(task).await?;
        let state = app.albums.state();
        confirmed(state.track_added, Some(()), state.error_message, "track")?;
        app.albums.clear_track_added();
    }

    let album = app.albums.state().selected_album.unwrap_or(album);
    println!("Created album {}", album.id);
    println!("{}", album_detail(&album));
    Ok(())
}

async fn join(task: JoinHandle<()>) -> Result<()> {
    task.await.context("view model task failed")
}

fn confirmed<T>(
    done: bool,
    value: Option<T>,
    error_message: Option<String>,
    what: &str,
) -> Result<T> {
    match (done, value) {
        (true, Some(value)) => Ok(value),
        _ => match error_message {
            Some(message) => bail!(message),
            None => bail!("backend did not confirm the {what}"),
        },
    }
}

fn invalid_input(err: ValidationError) -> anyhow::Error {
    let lines: Vec<_> = err.errors().iter().map(|error| format!("  {error}")).collect();
    anyhow!("invalid input:\n{}", lines.join("\n"))
}

fn fail_on_error(error_message: Option<String>) -> Result<()> {
    match error_message {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

fn album_summary(album: &Album) -> String {
    format!(
        "{:>4}  {} ({}) [{}]",
        album.id,
        album.name,
        album
            .release_year()
            .map_or_else(|| "????".to_string(), |year| year.to_string()),
        album.genre
    )
}

fn album_detail(album: &Album) -> String {
    let mut lines = vec![
        format!("# {}", album.name),
        format!("Released: {}", album.release_date),
        format!("Genre: {}", album.genre),
        format!("Label: {}", album.record_label_label()),
        format!("Cover: {}", album.cover),
        String::new(),
        album.description.clone(),
        String::new(),
        "Tracks:".to_string(),
    ];

    if album.tracks.is_empty() {
        lines.push("- No tracks".to_string());
    } else {
        lines.extend(album.as_track_listing_lines());
    }

    lines.join("\n")
}

fn artist_detail(artist: &Artist) -> String {
    let mut lines = vec![format!("# {}", artist.name)];
    if let Some(birth_date) = artist.birth_date_label() {
        lines.push(format!("Born: {birth_date}"));
    }
    lines.push(format!("Image: {}", artist.image));
    lines.push(String::new());
    lines.push(artist.description.clone());
    lines.push(String::new());
    lines.push("Albums:".to_string());
    lines.extend(artist.albums().iter().map(album_summary));
    lines.join("\n")
}

fn collector_detail(collector: &Collector, albums: &[Album]) -> String {
    let mut lines = vec![
        format!("# {}", collector.name),
        format!("Phone: {}", collector.telephone),
        format!("Email: {}", collector.email),
        format!("Image: {}", collector.image().unwrap_or("-")),
        format!("Favorite performers: {}", collector.favorite_performers_label()),
        String::new(),
        "Albums:".to_string(),
    ];

    lines.extend(collector.collector_albums.iter().map(|owned| {
        format!(
            "- {} ${} ({})",
            owned.display_name(albums),
            owned.price,
            owned.status
        )
    }));

    if !collector.comments.is_empty() {
        lines.push(String::new());
        lines.push("Comments:".to_string());
        lines.extend(
            collector
                .comments
                .iter()
                .map(|comment| format!("- [{}/5] {}", comment.rating, comment.description)),
        );
    }

    lines.join("\n")
}
