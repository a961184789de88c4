//! Seed command - register repositories and warm every cache

use std::io::Write;

use chartview_service::{ChartService, SeedReport};

use crate::commands::SeedInput;
use crate::config::Settings;
use crate::error::{CliError, Result};

pub async fn run(settings: &Settings, input: &SeedInput) -> Result<()> {
    let service = settings.build_service().await?;
    let report = seed(&service, input).await?;

    let stdout = std::io::stdout();
    print_summary(&mut stdout.lock(), &report)?;

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::Seed {
            failures: report.failures.len(),
        })
    }
}

/// Register the inputs, then seed every registered repository
pub async fn seed(service: &ChartService, input: &SeedInput) -> Result<SeedReport> {
    if input.apply(service).await?.is_none() {
        tracing::warn!("no repository seed given; seeding already registered repositories");
    }

    tracing::info!("starting to populate the cache");
    Ok(service.seed().await?)
}

fn print_summary(out: &mut impl Write, report: &SeedReport) -> Result<()> {
    writeln!(
        out,
        "Seeded {} repositories, {} charts, {} versions",
        report.repositories, report.charts, report.versions
    )?;

    if !report.failures.is_empty() {
        writeln!(out, "{} failure(s):", report.failures.len())?;
        for failure in &report.failures {
            writeln!(out, "  {}", failure)?;
        }
    }
    Ok(())
}
