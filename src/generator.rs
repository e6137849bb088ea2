//! The end-to-end report pipeline: fetch, map, render, write, verify.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use log::{error, info};

use crate::builder;
use crate::config::GenerationRequest;
use crate::error::GenerationError;
use crate::model::Report;
use crate::outcome::{GenerationResult, ReportMetadata};
use crate::report::{build_report, ReportOptions};
use crate::store::{MongoStore, RecordStore};

/// Connects to the configured store, generates the report and converts every
/// failure into a [`GenerationResult`].
///
/// The store connection lives only for the duration of this call.
pub fn run(request: &GenerationRequest) -> GenerationResult {
    let outcome = MongoStore::connect(&request.store)
        .and_then(|store| generate_report(&store, request, Local::now().naive_local()));
    into_result(outcome)
}

/// Converts a pipeline outcome into the result object, logging failures.
pub fn into_result(outcome: Result<ReportMetadata, GenerationError>) -> GenerationResult {
    match outcome {
        Ok(metadata) => {
            info!("PDF generated: {} ({} bytes)", metadata.path, metadata.size);
            GenerationResult::succeeded(metadata)
        }
        Err(err) => {
            error!("[{}] PDF generation failed: {}", err.kind(), err);
            GenerationResult::failed(err.to_string())
        }
    }
}

/// Generates the report for `request.solicitud_id` from `store`.
///
/// `now` drives the file name, the signer date and the reported generation
/// time. Nothing is written unless the record exists and renders.
pub fn generate_report<S>(
    store: &S,
    request: &GenerationRequest,
    now: NaiveDateTime,
) -> Result<ReportMetadata, GenerationError>
where
    S: RecordStore + ?Sized,
{
    let record = store
        .find_application(&request.solicitud_id)?
        .ok_or_else(|| GenerationError::NotFound(request.solicitud_id.clone()))?;

    let output_dir = request.resolve_output_dir();
    fs::create_dir_all(&output_dir).map_err(|err| GenerationError::io(&output_dir, err))?;

    let filename = report_file_name(&request.solicitud_id, now);
    let path = output_dir.join(&filename);

    let report = build_report(
        &record,
        &ReportOptions {
            include_agreement: request.include_agreement,
            include_signers: request.include_signers,
            generated_on: now.date(),
        },
    );
    let bytes = render_pdf(&report)?;
    fs::write(&path, &bytes).map_err(|err| GenerationError::io(&path, err))?;

    let size = written_size(&path)?;
    Ok(ReportMetadata {
        filename,
        path: path.display().to_string(),
        size,
        generated_at: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        include_agreement: request.include_agreement,
        include_signers: request.include_signers,
    })
}

/// Renders `report` to PDF bytes, with section bookmarks when enabled.
pub fn render_pdf(report: &Report) -> Result<Vec<u8>, GenerationError> {
    let rendered = builder::render_report(report)?;

    #[cfg(feature = "bookmarks")]
    let bytes = crate::bookmarks::apply_section_bookmarks(
        &rendered.bytes,
        report.sections(),
        &rendered.section_pages,
    )?;
    #[cfg(not(feature = "bookmarks"))]
    let bytes = rendered.bytes;

    Ok(bytes)
}

/// Builds `solicitud_{id}_{YYYYMMDD_HHMMSS}.pdf`.
///
/// Characters outside `[A-Za-z0-9_-]` in the identifier become `_`, so the
/// name never contains path separators.
pub fn report_file_name(solicitud_id: &str, now: NaiveDateTime) -> String {
    let safe_id: String = solicitud_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("solicitud_{}_{}.pdf", safe_id, now.format("%Y%m%d_%H%M%S"))
}

fn written_size(path: &Path) -> Result<u64, GenerationError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() && metadata.len() > 0 => Ok(metadata.len()),
        _ => Err(GenerationError::OutputMissing(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn file_name_embeds_identifier_and_timestamp() {
        assert_eq!(
            report_file_name("SOL-2024_001", at(9, 5, 7)),
            "solicitud_SOL-2024_001_20240517_090507.pdf"
        );
    }

    #[test]
    fn file_name_differs_across_seconds() {
        assert_ne!(
            report_file_name("abc", at(9, 5, 7)),
            report_file_name("abc", at(9, 5, 8))
        );
    }

    #[test]
    fn file_name_cannot_escape_the_output_directory() {
        let name = report_file_name("../../etc/passwd", at(0, 0, 0));
        assert!(!name.contains('/'));
        assert_eq!(name, "solicitud_______etc_passwd_20240517_000000.pdf");
    }

    #[test]
    fn empty_or_missing_files_are_reported() {
        let directory = tempfile::tempdir().unwrap();
        let empty = directory.path().join("empty.pdf");
        fs::write(&empty, b"").unwrap();

        assert!(matches!(
            written_size(&empty),
            Err(GenerationError::OutputMissing(_))
        ));
        assert!(matches!(
            written_size(&directory.path().join("absent.pdf")),
            Err(GenerationError::OutputMissing(_))
        ));
    }

    #[test]
    fn failures_become_failed_results() {
        let result = into_result(Err(GenerationError::NotFound("SOL-9".into())));
        assert!(!result.is_success());
        assert_eq!(result.error(), Some("Solicitud no encontrada: SOL-9"));
    }
}
