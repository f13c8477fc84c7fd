// src/output/plan.rs
//! Turns collected results into the list of writes that publish them.

use super::paths::OutputLayout;
use crate::error::AppError;
use crate::model::ArticleHistory;
use crate::types::ContributorAddress;
use std::path::PathBuf;

/// One write of a harvest's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Make sure the results directory exists.
    Directory(PathBuf),
    /// Replace a result file with `content`.
    File { path: PathBuf, content: String },
    /// Pipe mode: the refined address list on stdout.
    Stdout(String),
}

impl Delivery {
    pub fn describe(&self) -> String {
        match self {
            Delivery::Directory(path) => format!("create {}", path.display()),
            Delivery::File { path, .. } => format!("write {}", path.display()),
            Delivery::Stdout(_) => "print the address list".to_string(),
        }
    }
}

/// The writes of one harvest, in the order they are carried out.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub deliveries: Vec<Delivery>,
}

/// Plans the result files of a harvest.
///
/// `revisions.json` and `addresses.txt` are always written. In pipe mode the
/// refined address list is also printed to stdout.
pub fn plan_results(
    layout: &OutputLayout,
    histories: &[ArticleHistory],
    addresses: &[ContributorAddress],
    pipe: bool,
) -> Result<OutputPlan, AppError> {
    let mut revisions = serde_json::to_string_pretty(histories)?;
    revisions.push('\n');
    let address_list = render_address_list(addresses);

    let mut deliveries = vec![
        Delivery::Directory(layout.root().to_path_buf()),
        Delivery::File {
            path: layout.revisions(),
            content: revisions,
        },
        Delivery::File {
            path: layout.refined_addresses(),
            content: address_list.clone(),
        },
    ];
    if pipe {
        deliveries.push(Delivery::Stdout(address_list));
    }

    Ok(OutputPlan { deliveries })
}

/// One address per line, newline-terminated.
pub fn render_address_list(addresses: &[ContributorAddress]) -> String {
    addresses.iter().map(|a| format!("{}\n", a)).collect()
}
