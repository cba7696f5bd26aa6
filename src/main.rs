//! asl-tts - AllStarLink 文本转语音命令行
//!
//! - speak: 用已有录音拼接朗读，缺失单词交给 TTS
//! - tts: 整段文本交给 TTS（带缓存）
//! - seed: 预生成常用声音片段
//! - cache / index: 缓存维护与索引查看

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use asl_tts_tools::application::ports::{
    AudioAssemblerPort, ClipCachePort, PlaybackPort, SoundLibraryPort, TtsEnginePort,
};
use asl_tts_tools::application::{
    exit_code, ApplicationError, CacheManager, CleanCacheCommand, CleanCacheHandler,
    FallbackSynthesizer, GetIndexReport, IndexReportHandler, ListCacheEntries, ListCacheHandler,
    PhraseResolver, SeedCommand, SeedHandler, SpeakCommand, SpeakHandler, SynthesizeCommand,
    SynthesizeHandler,
};
use asl_tts_tools::config::{
    load_config_from_path, prepare_directories, print_config, AppConfig, AssemblerKind,
    CacheBackend, ConfigError, TtsBackend,
};
use asl_tts_tools::infrastructure::adapters::{
    AsteriskPlayer, CommandTtsClient, DirectorySoundLibrary, HttpTtsClient, HttpTtsClientConfig,
    RawConcatAssembler, SoxAssembler,
};
use asl_tts_tools::infrastructure::persistence::sled::open_shared;
use asl_tts_tools::infrastructure::persistence::{FileClipCache, SledClipCacheConfig};

/// ASL TTS Tools - text to speech for AllStarLink nodes
#[derive(Parser)]
#[command(name = "asl-tts")]
#[command(about = "Text to speech for AllStarLink nodes from recorded sounds", long_about = None)]
struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, global = true, value_name = "FILE", env = "ASL_TTS_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak text by concatenating recorded sounds
    Speak {
        /// Text to speak (read from stdin when omitted)
        text: Option<String>,

        /// Node to play the result on
        #[arg(short, long)]
        node: Option<String>,

        /// Write the result to FILE (format from its extension)
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,

        /// Synthesize words missing from the sound library
        #[arg(short = 'g', long = "generate")]
        generate: bool,
    },
    /// Synthesize the whole text with the TTS engine
    Tts {
        text: String,

        #[arg(short, long)]
        node: Option<String>,

        /// Copy the clip to FILE.ul
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Pre-generate the common phrase catalog into the custom sounds directory
    Seed {
        /// Regenerate files that already exist
        #[arg(long)]
        force: bool,

        /// Concurrent synthesis jobs
        #[arg(long, default_value_t = 4)]
        threads: usize,

        /// Extra phrases, one `filename->text` or `text` per line
        #[arg(long, value_name = "FILE")]
        phrases: Option<PathBuf>,
    },
    /// Manage the synthesis cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// Print the phrase to sound file mapping
    Index {
        /// Also list ignored duplicate files
        #[arg(long)]
        collisions: bool,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Apply the eviction policy, or remove everything with --all
    Clean {
        #[arg(long)]
        all: bool,
    },
    /// List cached clips
    List,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_code::INVALID_ARGS
            } else {
                exit_code::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            error_exit_code(&e)
        }
    };
    std::process::exit(code);
}

fn error_exit_code(err: &anyhow::Error) -> i32 {
    if let Some(app) = err.downcast_ref::<ApplicationError>() {
        app.exit_code()
    } else if err.downcast_ref::<ConfigError>().is_some() {
        exit_code::CONFIG
    } else {
        exit_code::FILE
    }
}

fn init_logging(config: &AppConfig, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let log_filter = format!("{},asl_tts_tools={}", level, level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let mut config = load_config_from_path(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);
    print_config(&config);
    prepare_directories(&config)?;

    match cli.command {
        Commands::Speak {
            text,
            node,
            file,
            generate,
        } => {
            if generate {
                config.auto_generate_words = true;
            }
            let text = match text {
                Some(text) => text,
                None => read_stdin().await?,
            };

            let clips = clip_cache(&config)?;
            let handler = SpeakHandler::new(
                sound_library(),
                config.sound_directories(),
                Arc::new(resolver(&config, clips.clone())?),
                assembler(&config),
                player(&config),
                clips,
                rendered_cache(&config)?,
            );

            let response = handler
                .handle(SpeakCommand {
                    text,
                    node,
                    output_file: file,
                })
                .await?;
            if !response.skipped.is_empty() {
                eprintln!("Skipped: {}", response.skipped.join(", "));
            }
            println!("{}", response.output_path.display());
        }
        Commands::Tts { text, node, file } => {
            let clips = clip_cache(&config)?;
            let synthesizer = Arc::new(FallbackSynthesizer::new(
                tts_engine(&config)?,
                clips.clone(),
                config.max_phrase_words_for_filenames,
            ));
            let handler = SynthesizeHandler::new(synthesizer, clips, player(&config));

            let response = handler
                .handle(SynthesizeCommand {
                    text,
                    node,
                    output_file: file,
                })
                .await?;
            println!(
                "{}",
                response
                    .output_path
                    .as_ref()
                    .unwrap_or(&response.clip_path)
                    .display()
            );
        }
        Commands::Seed {
            force,
            threads,
            phrases,
        } => {
            let handler = SeedHandler::new(
                tts_engine(&config)?,
                &config.custom_sounds_directory,
                config.max_phrase_words_for_filenames,
            );
            let response = handler
                .handle(SeedCommand {
                    force,
                    threads,
                    phrases_file: phrases,
                })
                .await?;

            for failure in &response.failed {
                eprintln!(
                    "Failed: {} ({}): {}",
                    failure.file.display(),
                    failure.text,
                    failure.error
                );
            }
            println!(
                "Generated {}, skipped {}, failed {}",
                response.generated,
                response.skipped,
                response.failed.len()
            );
            if !response.failed.is_empty() {
                return Err(ApplicationError::Audio(format!(
                    "{} phrases failed to generate",
                    response.failed.len()
                ))
                .into());
            }
        }
        Commands::Cache { command } => {
            let clips = clip_cache(&config)?;
            let rendered = rendered_cache(&config)?;
            match command {
                CacheCommand::Clean { all } => {
                    let response = CleanCacheHandler::new(clips, rendered)
                        .handle(CleanCacheCommand { all })
                        .await?;
                    println!(
                        "Removed {}, failed {}, remaining {}",
                        response.removed, response.failed, response.remaining
                    );
                }
                CacheCommand::List => {
                    let listing = ListCacheHandler::new(clips, rendered)
                        .handle(ListCacheEntries)
                        .await?;
                    for entry in listing.clips.iter().chain(listing.rendered.iter()) {
                        println!(
                            "{}  {:>8}  {}",
                            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                            entry.size_bytes,
                            entry.path.display()
                        );
                    }
                    println!(
                        "{} clips, {} rendered, {} bytes",
                        listing.clips.len(),
                        listing.rendered.len(),
                        listing.total_bytes()
                    );
                }
            }
        }
        Commands::Index { collisions } => {
            let report = IndexReportHandler::new(
                sound_library(),
                config.sound_directories(),
            )
            .handle(GetIndexReport {
                include_collisions: collisions,
            })
            .await?;

            for entry in &report.entries {
                println!("{} -> {}", entry.key, entry.path.display());
            }
            for collision in &report.collisions {
                println!(
                    "collision: {} -> {} (ignored {})",
                    collision.key.as_str(),
                    collision.kept.display(),
                    collision.ignored.display()
                );
            }
            println!(
                "{} entries ({} base, {} custom)",
                report.entries.len(),
                report.base_count,
                report.custom_count
            );
        }
    }

    Ok(())
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| ApplicationError::invalid_input(format!("failed to read stdin: {}", e)))?;
    Ok(text)
}

fn tts_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    let engine: Arc<dyn TtsEnginePort> = match config.tts_backend {
        TtsBackend::Command => Arc::new(CommandTtsClient::new(&config.asl_tts_bin)),
        TtsBackend::Http => {
            let tts_config =
                HttpTtsClientConfig::new(&config.tts_url).with_timeout(config.tts_timeout_secs);
            Arc::new(
                HttpTtsClient::new(tts_config)
                    .map_err(|e| ApplicationError::Config(e.to_string()))?,
            )
        }
    };
    Ok(engine)
}

fn clip_cache(config: &AppConfig) -> anyhow::Result<Arc<CacheManager>> {
    let store: Arc<dyn ClipCachePort> = match config.cache_backend {
        CacheBackend::Files => Arc::new(
            FileClipCache::new(&config.cache_directory).map_err(ApplicationError::from)?,
        ),
        CacheBackend::Sled => {
            open_shared(&SledClipCacheConfig::in_dir(&config.cache_directory))
                .map_err(ApplicationError::from)?
        }
    };
    Ok(Arc::new(CacheManager::new(store, config.cache_policy())))
}

fn rendered_cache(config: &AppConfig) -> anyhow::Result<Arc<CacheManager>> {
    let store = FileClipCache::new(config.rendered_directory()).map_err(ApplicationError::from)?;
    Ok(Arc::new(CacheManager::new(Arc::new(store), config.cache_policy())))
}

fn resolver(config: &AppConfig, clips: Arc<CacheManager>) -> anyhow::Result<PhraseResolver> {
    let synthesizer = if config.auto_generate_words {
        Some(Arc::new(FallbackSynthesizer::new(
            tts_engine(config)?,
            clips,
            config.max_phrase_words_for_filenames,
        )))
    } else {
        None
    };
    Ok(PhraseResolver::new(config.resolver_options(), synthesizer))
}

fn assembler(config: &AppConfig) -> Arc<dyn AudioAssemblerPort> {
    match config.assembler {
        AssemblerKind::Sox => Arc::new(SoxAssembler::new(&config.sox_bin)),
        AssemblerKind::Raw => Arc::new(RawConcatAssembler::new()),
    }
}

fn player(config: &AppConfig) -> Arc<dyn PlaybackPort> {
    Arc::new(AsteriskPlayer::new(&config.asterisk_bin))
}

fn sound_library() -> Arc<dyn SoundLibraryPort> {
    Arc::new(DirectorySoundLibrary::new())
}
