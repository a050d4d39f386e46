use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lectern_lib::db::Database;
use lectern_lib::llm::RemoteLlmClient;
use lectern_lib::logger::{info, Component};
use lectern_lib::pipeline::{LecturePipeline, PipelineConfig, SubmitRequest};
use lectern_lib::projection;
use lectern_lib::services::{AccessGate, LecturesService, StudyService};
use lectern_lib::settings::SettingsManager;
use lectern_lib::storage::HttpMediaStore;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Headless lecture-capture processing engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Data directory for the database and settings (defaults to the
    /// platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Access code, required when this instance is gated
    #[arg(long)]
    access_code: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit an audio file for transcription and enrichment
    Submit {
        /// Path to the audio file
        #[arg(long)]
        audio: PathBuf,

        /// Lecture title
        #[arg(long)]
        title: String,

        /// Lecture date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Seconds to stay alive after completion so background
        /// study-aid generation can finish
        #[arg(long, default_value = "0")]
        wait_secs: u64,
    },

    /// Show one lecture
    Get { id: i64 },

    /// List lectures, most recent first
    List {
        /// Result cap
        #[arg(long)]
        limit: Option<i64>,

        /// Case-insensitive search over title, category, and summary
        #[arg(long)]
        search: Option<String>,

        /// Restrict to a calendar month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Delete a lecture and its study aids
    Delete { id: i64 },

    /// List flashcards generated for a lecture
    Flashcards { lecture_id: i64 },

    /// List quiz questions generated for a lecture
    Quiz { lecture_id: i64 },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_year_month(value: &str) -> Result<(i32, u32)> {
    let (year, month) = value
        .split_once('-')
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", value))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in '{}'", value))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in '{}'", value))?;
    if !(1..=12).contains(&month) {
        bail!("Month out of range in '{}'", value);
    }
    Ok((year, month))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let args = Args::parse();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("Could not resolve a platform data directory")?
            .join("lectern"),
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

    let settings = SettingsManager::new(&data_dir).map_err(anyhow::Error::msg)?;
    let app_settings = settings.get().clone();

    let gate = AccessGate::new(app_settings.access.access_code.clone());
    if !gate.verify(args.access_code.as_deref()) {
        bail!("Access denied: invalid or missing access code");
    }

    let database = Arc::new(
        Database::new(&data_dir.join("lectern.db"))
            .await
            .map_err(anyhow::Error::msg)?,
    );

    let media_store = Arc::new(HttpMediaStore::new(&app_settings.storage.upload_url));
    let llm = Arc::new(RemoteLlmClient::new(
        &app_settings.llm.invoke_url,
        Duration::from_secs(app_settings.llm.timeout_secs),
    ));
    let pipeline = Arc::new(LecturePipeline::new(
        database.clone(),
        media_store,
        llm,
        PipelineConfig::from_settings(&app_settings),
    ));

    let lectures = LecturesService::new(database.clone(), pipeline);
    let study = StudyService::new(database);

    match args.command {
        Command::Submit {
            audio,
            title,
            date,
            wait_secs,
        } => {
            let bytes = tokio::fs::read(&audio)
                .await
                .with_context(|| format!("Failed to read audio file {}", audio.display()))?;
            let file_name = audio
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "lecture-audio".to_string());

            let record = lectures
                .submit_lecture(SubmitRequest {
                    file_name,
                    audio: bytes,
                    title,
                    date,
                })
                .await?;
            print_json(&record)?;

            if wait_secs > 0 {
                info(
                    Component::Cli,
                    &format!("Waiting {}s for background study aids", wait_secs),
                );
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            }
        }

        Command::Get { id } => {
            let record = lectures.get_lecture(id).await?;
            print_json(&record)?;
        }

        Command::List {
            limit,
            search,
            month,
        } => {
            let limit = limit.unwrap_or(app_settings.pipeline.list_limit);
            let all = lectures.list_lectures(limit).await?;

            let mut filtered = projection::filter_by_search(&all, search.as_deref().unwrap_or(""));

            if let Some(month) = month.as_deref() {
                let (year, month) = parse_year_month(month)?;
                let in_month: std::collections::HashSet<i64> =
                    projection::filter_by_month(&all, year, month)
                        .into_iter()
                        .map(|record| record.id)
                        .collect();
                filtered.retain(|record| in_month.contains(&record.id));
            }

            print_json(&filtered)?;
        }

        Command::Delete { id } => {
            lectures.delete_lecture(id).await?;
            info(Component::Cli, &format!("Deleted lecture {}", id));
        }

        Command::Flashcards { lecture_id } => {
            let cards = study.list_flashcards(lecture_id).await?;
            print_json(&cards)?;
        }

        Command::Quiz { lecture_id } => {
            let questions = study.list_quiz_questions(lecture_id).await?;
            print_json(&questions)?;
        }
    }

    Ok(())
}
