// src/output/writer.rs
//! Carries out an [`OutputPlan`]. Apart from the append logs, this is the
//! only place result files are written.

use super::plan::{Delivery, OutputPlan};
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What [`deliver`] managed to write.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    /// Result files written, in plan order.
    pub saved: Vec<PathBuf>,
    /// One message per delivery that failed.
    pub failures: Vec<String>,
}

impl OutputReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Performs every delivery in the plan.
///
/// A failed delivery is recorded in the report and does not stop the
/// ones after it.
pub fn deliver(plan: OutputPlan) -> Result<OutputReport, AppError> {
    let mut report = OutputReport::default();
    log::debug!("Delivering {} result outputs", plan.deliveries.len());

    for delivery in plan.deliveries {
        let outcome = match &delivery {
            Delivery::Directory(path) => ensure_directory(path),
            Delivery::File { path, content } => write_file(path, content),
            Delivery::Stdout(content) => print_to_stdout(content),
        };
        match (outcome, delivery) {
            (Ok(()), Delivery::File { path, .. }) => report.saved.push(path),
            (Ok(()), _) => {}
            (Err(e), delivery) => {
                let failure = format!("{}: {}", delivery.describe(), e);
                log::error!("Failed to {}", failure);
                report.failures.push(failure);
            }
        }
    }

    log::debug!(
        "Saved {} result files, {} deliveries failed",
        report.saved.len(),
        report.failures.len()
    );
    Ok(report)
}

fn write_file(path: &Path, content: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    log::info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

fn ensure_directory(path: &Path) -> Result<(), AppError> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        )));
    }
    fs::create_dir_all(path)?;
    Ok(())
}

fn print_to_stdout(content: &str) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
