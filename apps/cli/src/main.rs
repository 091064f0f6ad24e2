use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use notetaker_core::{
    ChatOutliner, NoopOutliner, NoteMode, Notetaker, OutlineCache, OutlineExtractor,
    OutlineMerger, PipelineConfig, Provider, YtDlpSource, config::DEFAULT_MAX_WORKERS,
    config::DEFAULT_THRESHOLD_SECONDS, format_playlist_markdown, format_video_markdown,
    get_root_cache_dir, outline_tag, write_document,
};

mod logging;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Openai,
    Grok,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "notetaker")]
#[command(about = "Turn YouTube playlists and videos into ordered, AI-distilled markdown notes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one notes document per playlist
    Generate {
        /// One or more playlist URLs
        #[arg(required = true)]
        playlist_urls: Vec<String>,

        /// Quote each video's plain transcript above its notes
        #[arg(long = "include-raw")]
        include_raw: bool,

        /// Videos processed in parallel
        #[arg(long, default_value_t = DEFAULT_MAX_WORKERS)]
        max_workers: usize,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Generate a notes document for a single video
    GenerateSingle {
        /// Video URL
        video_url: String,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Directory to save the notes in
    #[arg(short, long, default_value = "playlists_docs")]
    output_dir: PathBuf,

    /// Skip the language model; documents only carry titles
    #[arg(long = "no-llm")]
    no_llm: bool,

    /// Model identifier passed to the provider (defaults per provider)
    #[arg(short, long)]
    model: Option<String>,

    /// AI provider for note generation
    #[arg(short, long, default_value = "openai")]
    provider: CliProvider,

    /// Videos longer than this are split into parts of this length
    #[arg(long, default_value_t = DEFAULT_THRESHOLD_SECONDS)]
    segment_seconds: u64,

    /// Ignore cached outlines
    #[arg(short, long)]
    force: bool,
}

fn create_spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn build_notetaker(common: &CommonArgs, mode: NoteMode, config: PipelineConfig) -> Result<Notetaker> {
    let source = Arc::new(YtDlpSource::new()?);

    if !config.use_llm {
        let noop = Arc::new(NoopOutliner);
        return Ok(Notetaker::new(
            source,
            Arc::clone(&noop) as Arc<dyn OutlineExtractor>,
            noop as Arc<dyn OutlineMerger>,
            None,
            config,
        ));
    }

    let provider: Provider = common.provider.clone().into();
    let outliner = Arc::new(ChatOutliner::new(&provider, common.model.as_deref(), mode)?);

    println!(
        "{} Using {} ({})",
        style("✓").green().bold(),
        provider.name(),
        style(outliner.model()).yellow()
    );

    let cache = OutlineCache::new(
        get_root_cache_dir(),
        outline_tag(provider.slug(), outliner.model(), mode, config.threshold_seconds),
    );

    Ok(Notetaker::new(
        source,
        Arc::clone(&outliner) as Arc<dyn OutlineExtractor>,
        outliner as Arc<dyn OutlineMerger>,
        Some(cache),
        config,
    ))
}

fn print_saved(path: &Path, started: Instant) {
    println!(
        "\n{} {}  {}",
        style("Saved:").dim(),
        style(path.display()).cyan(),
        style(format!("[{}]", format_duration(started.elapsed()))).dim()
    );
}

async fn generate_playlists(
    playlist_urls: Vec<String>,
    include_raw: bool,
    max_workers: usize,
    common: CommonArgs,
) -> Result<()> {
    let config = PipelineConfig {
        threshold_seconds: common.segment_seconds,
        max_workers,
        use_llm: !common.no_llm,
        include_raw_transcript: include_raw,
        force: common.force,
    };
    let notetaker = build_notetaker(&common, NoteMode::Playlist, config)?;

    let mut failed_playlists = 0;
    for url in playlist_urls {
        let started = Instant::now();
        let spinner = create_spinner(&format!("Processing playlist: {}", url))?;

        let notes = match notetaker.playlist_notes(&url).await {
            Ok(notes) => notes,
            Err(e) => {
                spinner.finish_with_message(format!(
                    "{} {}: {}",
                    style("✗").red().bold(),
                    url,
                    e
                ));
                failed_playlists += 1;
                continue;
            }
        };

        let failed = notes.failed_count();
        let summary = if failed == 0 {
            style(format!("{} videos", notes.videos.len())).dim()
        } else {
            style(format!("{} videos, {} failed", notes.videos.len(), failed)).yellow()
        };
        spinner.finish_with_message(format!(
            "{} {} {}",
            style("✓").green().bold(),
            notes.title,
            summary
        ));

        let path = write_document(
            &common.output_dir,
            &notes.title,
            &format_playlist_markdown(&notes),
        )
        .await?;
        print_saved(&path, started);
    }

    if failed_playlists > 0 {
        anyhow::bail!("{} playlist(s) could not be processed", failed_playlists);
    }
    Ok(())
}

async fn generate_single(video_url: String, common: CommonArgs) -> Result<()> {
    let config = PipelineConfig {
        threshold_seconds: common.segment_seconds,
        use_llm: !common.no_llm,
        force: common.force,
        ..Default::default()
    };
    let notetaker = build_notetaker(&common, NoteMode::Single, config)?;

    let started = Instant::now();
    let spinner = create_spinner(&format!("Processing video: {}", video_url))?;
    let notes = notetaker.video_notes(&video_url).await?;
    spinner.finish_with_message(format!("{} {}", style("✓").green().bold(), notes.title));

    let path = write_document(&common.output_dir, &notes.title, &format_video_markdown(&notes)).await?;
    print_saved(&path, started);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    println!(
        "\n{}  {}\n",
        style("notetaker").cyan().bold(),
        style("Video Notes").dim()
    );

    let common = match &cli.command {
        Command::Generate { common, .. } | Command::GenerateSingle { common, .. } => common,
    };
    if !common.no_llm {
        let provider: Provider = common.provider.clone().into();
        if let Err(e) = provider.validate_api_key() {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }

    match cli.command {
        Command::Generate {
            playlist_urls,
            include_raw,
            max_workers,
            common,
        } => generate_playlists(playlist_urls, include_raw, max_workers, common).await,
        Command::GenerateSingle { video_url, common } => generate_single(video_url, common).await,
    }
}
