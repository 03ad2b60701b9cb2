// ABOUTME: CLI entrypoint for diary-sync command
// ABOUTME: Handles error exit codes and command dispatch

use chrono::Utc;
use clap::Parser;
use diary_sync::{
    api::ApiClient,
    cli::{Cli, Commands},
    config::Credentials,
    export::Exporter,
    logging::init_logging,
    storage::DirSink,
    Result,
};

fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    if let Err(e) = run() {
        tracing::error!(error = %e, "run failed");
        eprintln!("diary-sync: [E{}] {}", e.exit_code(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let credentials = Credentials::resolve(cli.token.clone(), cli.database_id.clone())?;
    let config = cli.export_config()?;

    let mut client = ApiClient::new(credentials.token.clone(), Some(cli.api_base.clone()))?;
    if cli.no_throttle {
        client = client.disable_throttle();
    } else if let Some((min, max)) = cli.throttle_ms {
        client = client.with_throttle(min, max);
    }

    let exporter = Exporter::new(&client, credentials.database_id.clone(), config);

    match cli.command() {
        Commands::Export => {
            let mut sink = DirSink::new(&cli.out_dir);
            sink.ensure_dir()?;
            let summary = exporter.with_progress(true).export(&mut sink, Utc::now())?;
            println!(
                "exported {} entries to {} (combined: {})",
                summary.entries,
                cli.out_dir.display(),
                summary.combined
            );
        }
        Commands::List => {
            for entry in exporter.list_entries()? {
                println!("{}\t{}\t{}", entry.date, entry.title, entry.file_name());
            }
        }
        Commands::Show { id } => {
            let (_, markdown) = exporter.render_page(&id)?;
            print!("{}", markdown);
        }
    }

    Ok(())
}
