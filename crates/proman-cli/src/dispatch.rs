use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table};
use proman_app::export::export_inventory;
use proman_app::inventory::ProgressReporter;
use proman_app::record::RepositoryRecord;
use proman_app::{App, audit_log_for, load_settings};
use proman_core::command_runner::SystemCommandRunner;
use proman_core::config::{ProjectConfig, home_dir, resolve_config_path};
use proman_core::doctor::{DoctorReport, TokenSources, run_doctor};
use proman_core::github::GitHubClient;
use proman_core::time::now_utc_rfc3339;

use crate::cli::{Cli, Command};
use crate::credentials::{Credentials, StdinPrompt, TOKEN_FILE_NAME, load_credentials};

const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => resolve_config_path().context("failed to resolve config path")?,
    };

    match cli.command {
        Some(Command::Doctor) => run_doctor_command(&config_path),
        Some(Command::Export { out }) => run_export_command(&config_path, &out),
        None => run_dashboard_command(&config_path),
    }
}

/// Settings plus token, with the token file's timestamp as the audit fallback.
fn prepare(config_path: &Path) -> Result<(ProjectConfig, Credentials)> {
    let mut settings = load_settings(config_path)?;
    let token_path = home_dir()
        .context("failed to resolve home directory")?
        .join(TOKEN_FILE_NAME);

    let saved_at = match &settings.fixed_timestamp {
        Some(timestamp) => timestamp.clone(),
        None => now_utc_rfc3339().context("failed to format current time")?,
    };
    let credentials = load_credentials(
        &token_path,
        std::env::var(TOKEN_ENV).ok(),
        &mut StdinPrompt,
        &saved_at,
    )?;

    if settings.fixed_timestamp.is_none() {
        settings.fixed_timestamp = credentials.current_datetime.clone();
    }

    Ok((settings, credentials))
}

fn run_dashboard_command(config_path: &Path) -> Result<()> {
    let (settings, credentials) = prepare(config_path)?;
    let runner = SystemCommandRunner::new();
    let remote = GitHubClient::new(&credentials.token, &settings.api_base, settings.per_page)?;
    let audit = audit_log_for(&settings);
    let app = App::new(&runner, &remote, &settings, &audit);

    tracing::info!(projects_root = %settings.projects_root.display(), "opening dashboard");
    proman_tui::run_dashboard(&app)
}

/// Prints a running count on one stderr line while the export fetch runs.
struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn on_record(&mut self, processed: usize, total_hint: Option<usize>, record: &RepositoryRecord) {
        let mut stderr = io::stderr();
        let _ = match total_hint {
            Some(total) if total >= processed => write!(
                stderr,
                "\rFetched {processed}/~{total} repositories: {}\x1b[K",
                record.identity()
            ),
            _ => write!(
                stderr,
                "\rFetched {processed} repositories: {}\x1b[K",
                record.identity()
            ),
        };
        let _ = stderr.flush();
    }
}

fn run_export_command(config_path: &Path, out_dir: &Path) -> Result<()> {
    let (settings, credentials) = prepare(config_path)?;
    let runner = SystemCommandRunner::new();
    let remote = GitHubClient::new(&credentials.token, &settings.api_base, settings.per_page)?;
    let audit = audit_log_for(&settings);
    let app = App::new(&runner, &remote, &settings, &audit);

    let fetched = app.fetch_inventory(&mut StderrProgress);
    eprintln!();
    let inventory = fetched?;

    let generated_at = match &settings.fixed_timestamp {
        Some(timestamp) => timestamp.clone(),
        None => now_utc_rfc3339().context("failed to format current time")?,
    };
    let summary = export_inventory(&inventory, out_dir, &generated_at)?;

    println!(
        "Exported {} repositories to {} ({} Markdown files)",
        inventory.len(),
        summary.json_path.display(),
        summary.markdown_files
    );
    Ok(())
}

fn run_doctor_command(config_path: &Path) -> Result<()> {
    let token_file = home_dir()
        .context("failed to resolve home directory")?
        .join(TOKEN_FILE_NAME);
    let env_token_present = std::env::var(TOKEN_ENV)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false);

    let report = run_doctor(
        config_path,
        TokenSources {
            token_file: &token_file,
            env_token_present,
        },
    );
    print_doctor_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(check.state.to_string()),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}
