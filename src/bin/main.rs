use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use lyricsense::cache::LyricCache;
use lyricsense::config::Config;
use lyricsense::crawl::{CrawlOptions, CrawlProgress, CrawlService};
use lyricsense::export::export_json;
use lyricsense::models::Artist;
use lyricsense::sentiment::LexiconScorer;
use lyricsense::site::{HttpFetcher, PageFetcher, PageRenderer};

#[derive(Debug)]
enum Command {
    Crawl(CrawlArgs),
    List,
    Delete { artist: String },
    CreateBucket,
}

#[derive(Debug, Default)]
struct CrawlArgs {
    artist: String,
    force: bool,
    show_browser: bool,
    max_albums: Option<usize>,
    max_songs: Option<usize>,
    output: Option<PathBuf>,
    lyric: Option<String>,
}

#[tokio::main]
async fn main() {
    // Use RUST_LOG env var if set, otherwise default to info level
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("lyricsense");

    let command = match parse_args(&args[1.min(args.len())..]) {
        Ok(command) => command,
        Err(message) => {
            error!("{}", message);
            print_usage(program);
            std::process::exit(1);
        }
    };

    let config = Config::load();

    let cache = match LyricCache::connect(config.cache.clone()).await {
        Ok(cache) => cache,
        Err(e) => {
            warn!("Could not connect to the cache, continuing without it: {}", e);
            LyricCache::disabled(e.to_string())
        }
    };

    let result = match command {
        Command::Crawl(crawl_args) => crawl(&config, cache, crawl_args).await,
        Command::List => list(&cache).await,
        Command::Delete { artist } => cache.delete(&artist).await.map_err(Into::into),
        Command::CreateBucket => cache.create_bucket().await.map_err(Into::into),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let Some(command) = args.first() else {
        return Err("Missing command".to_string());
    };
    let rest = &args[1..];

    match command.as_str() {
        "crawl" => parse_crawl_args(rest).map(Command::Crawl),
        "list" => Ok(Command::List),
        "delete" => match rest {
            [artist] => Ok(Command::Delete {
                artist: artist.clone(),
            }),
            _ => Err("delete takes exactly one artist name".to_string()),
        },
        "create-bucket" => Ok(Command::CreateBucket),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_crawl_args(args: &[String]) -> Result<CrawlArgs, String> {
    let mut parsed = CrawlArgs::default();
    let mut name_parts: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--force" => parsed.force = true,
            "--show-browser" => parsed.show_browser = true,
            flag @ ("--max-albums" | "--max-songs" | "--output" | "--lyric") => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a value", flag))?;
                match flag {
                    "--max-albums" => parsed.max_albums = Some(parse_count(flag, value)?),
                    "--max-songs" => parsed.max_songs = Some(parse_count(flag, value)?),
                    "--output" => parsed.output = Some(PathBuf::from(value)),
                    _ => parsed.lyric = Some(value.clone()),
                }
                i += 1;
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown argument: {}", flag)),
            word => name_parts.push(word),
        }
        i += 1;
    }

    // Unquoted multi-word names arrive as separate arguments
    parsed.artist = name_parts.join(" ");
    if parsed.artist.trim().is_empty() {
        return Err("crawl requires an artist name".to_string());
    }

    Ok(parsed)
}

fn parse_count(flag: &str, value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))
}

async fn crawl(
    config: &Config,
    cache: LyricCache,
    args: CrawlArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.user_agent)?);
    let renderer = build_renderer(config, fetcher.clone(), args.show_browser);

    let mut options = CrawlOptions::from_config(config);
    options.max_albums = args.max_albums;
    options.max_songs = args.max_songs;

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let progress_task = tokio::spawn(log_progress(progress_rx));

    let service = CrawlService::new(
        options,
        renderer,
        fetcher,
        Arc::new(LexiconScorer::new()),
        cache,
    )
    .with_progress(progress_tx);

    let mut artist = Artist::new(args.artist).with_force_refresh(args.force);
    let outcome = service.run(&mut artist).await;

    // Closes the progress channel so the logger finishes
    drop(service);
    let _ = progress_task.await;

    let report = outcome?;
    info!(
        "Finished {} in {:.1}s: {} songs, state {}{}",
        report.artist,
        report.elapsed.as_secs_f64(),
        report.lyrics,
        report.state,
        if report.from_cache { " (from cache)" } else { "" }
    );

    if let Some(path) = &args.output {
        export_json(&artist.lyrics, path)?;
    }

    if let Some(query) = &args.lyric {
        match artist.find_lyric(query) {
            Some(record) => {
                println!("{} - {}", record.artist, record.song_title);
                println!();
                println!("{}", record.lyrics);
                if let Some(sentiment) = record.sentiment {
                    println!();
                    println!(
                        "words: {}, unique: {}, polarity: {:.3}, subjectivity: {:.3}",
                        sentiment.num_words,
                        sentiment.unique_words,
                        sentiment.polarity,
                        sentiment.subjectivity
                    );
                }
            }
            None => warn!("No song of {} matches '{}'", artist.name, query),
        }
    }

    Ok(())
}

#[cfg(feature = "browser")]
fn build_renderer(
    config: &Config,
    _fetcher: Arc<dyn PageFetcher>,
    show_browser: bool,
) -> Arc<dyn PageRenderer> {
    use lyricsense::site::ChromiumRenderer;

    Arc::new(ChromiumRenderer::new(
        config.base_url.clone(),
        config.headless && !show_browser,
        config.chrome_executable.clone(),
    ))
}

#[cfg(not(feature = "browser"))]
fn build_renderer(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
    show_browser: bool,
) -> Arc<dyn PageRenderer> {
    use lyricsense::site::StaticPageRenderer;

    if show_browser {
        warn!("Built without the browser feature, --show-browser is ignored");
    }
    Arc::new(StaticPageRenderer::new(fetcher, config.base_url.clone()))
}

async fn log_progress(mut progress_rx: mpsc::UnboundedReceiver<CrawlProgress>) {
    while let Some(progress) = progress_rx.recv().await {
        match progress {
            CrawlProgress::StageStarted { stage, total } => {
                info!("Starting {} ({} items)", stage, total)
            }
            CrawlProgress::ItemCompleted {
                stage,
                current,
                total,
                percent,
            } => debug!("{}: {}/{} ({}%)", stage, current, total, percent),
            CrawlProgress::CacheHit { artist, songs } => {
                info!("{} already cached ({} songs)", artist, songs)
            }
            CrawlProgress::StageFailed { stage, error } => warn!("{} failed: {}", stage, error),
            CrawlProgress::Complete { artist, songs } => {
                info!("Crawled {} songs for {}", songs, artist)
            }
        }
    }
}

async fn list(cache: &LyricCache) -> Result<(), Box<dyn std::error::Error>> {
    let artists = cache.list_artists().await?;
    if artists.is_empty() {
        info!("No artists cached");
    }
    for artist in artists {
        println!("{}", artist);
    }
    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!(
        "  {} crawl <artist> [--force] [--show-browser] [--max-albums N] [--max-songs N]",
        program
    );
    eprintln!("                   [--output FILE.json] [--lyric QUERY]");
    eprintln!("  {} list", program);
    eprintln!("  {} delete <artist>", program);
    eprintln!("  {} create-bucket", program);
    eprintln!();
    eprintln!("Caching needs AWS_ACCESS_KEY and AWS_SECRET_KEY; without them nothing is saved.");
}
