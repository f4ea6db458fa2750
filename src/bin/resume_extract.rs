use std::path::PathBuf;

use anyhow::Context;
use resume_extract_lib::core::service::CoreService;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: resume_extract [--enhance | --score [job.txt]] <resume.pdf|docx>...";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut enhance = false;
    let mut score = false;
    let mut job_path: Option<PathBuf> = None;
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut args = std::env::args().skip(1).peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--enhance" => enhance = true,
            "--score" => {
                score = true;
                job_path = args.next_if(|next| next.ends_with(".txt")).map(PathBuf::from);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    if paths.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
    if enhance && score {
        eprintln!("--enhance and --score cannot be combined");
        std::process::exit(1);
    }
    if (enhance || score) && paths.len() > 1 {
        eprintln!("--enhance and --score take a single file");
        std::process::exit(1);
    }

    let service = CoreService::new().await?;

    if paths.len() > 1 {
        let results = service.parse_batch(&paths).await;
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let path = &paths[0];
    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        std::process::exit(2);
    }

    let record = service.parse_file(path).await?;
    if score {
        let job_description = match &job_path {
            Some(job_path) => Some(
                tokio::fs::read_to_string(job_path)
                    .await
                    .with_context(|| format!("failed to read {}", job_path.display()))?,
            ),
            None => None,
        };
        let report = service.score(&record, job_description.as_deref());
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if enhance {
        let enhanced = service.enhance(&record).await;
        println!("{}", serde_json::to_string_pretty(&enhanced)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}
