use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tubepulse::{analyze, CancellationFlag, Config, YouTubeClient};

#[derive(Parser)]
#[command(name = "tubepulse")]
#[command(about = "Channel engagement analytics from a YouTube video URL")]
#[command(version)]
struct Args {
    /// URL of any video on the channel to analyze
    url: String,

    /// Lookback window in days (defaults to TUBEPULSE_LOOKBACK_DAYS or 90)
    #[arg(short, long)]
    days: Option<u32>,

    /// CPM used for earnings estimation
    #[arg(long)]
    cpm: Option<f64>,

    /// Output format: json (default) or summary
    #[arg(short, long, default_value = "json")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubepulse=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(days) = args.days {
        config.lookback_days = days;
    }
    if let Some(cpm) = args.cpm {
        config.cpm = cpm;
    }

    let client = YouTubeClient::new(&config).context("failed to build API client")?;

    // Ctrl-C abandons in-flight calls instead of printing a partial result.
    let cancel = CancellationFlag::default();
    let ctrlc_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc_flag.cancel();
        }
    });

    match analyze(&client, &config, &args.url, config.lookback_days, &cancel).await {
        Ok(result) => {
            if args.format == "summary" {
                print_summary(&result);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "analysis failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn print_summary(result: &tubepulse::AnalysisResult) {
    println!("Channel: {}", result.channel_id);
    println!("Videos in window: {}", result.total_videos);

    for (label, window) in &result.windowed {
        match window.last() {
            Some(point) => println!(
                "{}: {} buckets, latest engagement {:.4}, est. earnings ${:.2}",
                label,
                window.len(),
                point.engagement_rate,
                point.estimated_earnings
            ),
            None => println!("{}: no data", label),
        }
    }
}
