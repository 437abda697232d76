use std::path::Path;

use anyhow::{Context, Result};
use greenspace::{read_park_features, write_resolved_parks, Pipeline};

use crate::commands::{load_config, output_path};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ResolveArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    args.resolve.apply(&mut config);
    let out_path = output_path(&args.output, "resolved_parks.geojson");

    eprintln!("[resolve] loading parks from {}", args.parks.display());
    let features = read_park_features(&args.parks)?;

    let resolution = Pipeline::new(config).resolve(features);
    eprintln!(
        "[resolve] {} parks ({} merged clusters, {} removed, {} skipped)",
        resolution.parks.len(),
        resolution.report.merged.len(),
        resolution.report.removed_ids().count() - resolution.report.skipped.len(),
        resolution.report.skipped.len(),
    );

    eprintln!("[resolve] writing parks to {}", out_path.display());
    write_resolved_parks(&out_path, &resolution.parks)?;

    if let Some(report_path) = &args.report {
        write_report(report_path, &resolution.report)?;
    }
    Ok(())
}

fn write_report(path: &Path, report: &greenspace::ResolutionReport) -> Result<()> {
    let value = serde_json::json!({
        "intersection_edges": report.intersection_edges,
        "unnamed_removed": report.unnamed_removed,
        "contained_removed": report.contained_removed,
        "manually_removed": report.manually_removed,
        "merged": report.merged.iter()
            .map(|cluster| serde_json::json!({ "id": cluster.id, "members": cluster.members }))
            .collect::<Vec<_>>(),
        "skipped": report.skipped.iter()
            .map(|skipped| serde_json::json!({ "id": skipped.id, "reason": skipped.reason.to_string() }))
            .collect::<Vec<_>>(),
    });
    let bytes = serde_json::to_vec_pretty(&value).context("[resolve] Failed to serialize report")?;
    std::fs::write(path, bytes).with_context(|| format!("[resolve] Failed to write report to {}", path.display()))
}
