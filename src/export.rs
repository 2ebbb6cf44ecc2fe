//! JSON export of the current triage ("Exportar Datos").
//!
//! The export is a read-only snapshot of the session; nothing is persisted
//! by the workflow itself. The host decides where the JSON goes.

use serde::Serialize;

use crate::model::{CategoryId, DamageCategory};
use crate::state::{
    BatchGeneration, IngestionStatus, InspectionDetail, Selection, TriageSession, TriageStage,
};

/// Snapshot of a triage session.
#[derive(Debug, Clone, Serialize)]
pub struct TriageExport {
    /// UTC time of the export, ISO 8601
    pub exported_at: String,
    pub selection: Option<Selection>,
    /// `AssetName - ZoneName` of the selected zone
    pub zone_path: Option<String>,
    pub stage: TriageStage,
    pub upload: UploadSummary,
    /// Categories of the confirmed batch; empty before confirmation
    pub categories: Vec<DamageCategory>,
    pub active_category: Option<CategoryId>,
    pub finding: Option<InspectionDetail>,
}

/// Upload card section of the export.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub batch: BatchGeneration,
    pub status: IngestionStatus,
    pub progress: u8,
    pub items: Vec<String>,
}

impl TriageExport {
    pub fn from_session(session: &TriageSession) -> Self {
        let ingestion = session.ingestion();
        Self {
            exported_at: current_timestamp(),
            selection: session.selection().cloned(),
            zone_path: session
                .selection()
                .and_then(|s| s.path_label(session.fleet())),
            stage: session.stage(),
            upload: UploadSummary {
                batch: session.generation(),
                status: ingestion.status,
                progress: ingestion.progress,
                items: ingestion.batch.names(),
            },
            categories: session.categories().to_vec(),
            active_category: session.active_category().map(|c| c.id),
            finding: session.detail(),
        }
    }

    /// Serialize the export to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Suggested filename for saving the export.
    pub fn default_filename() -> &'static str {
        "hull-triage-export.json"
    }
}

/// Get the current timestamp as ISO 8601 string.
fn current_timestamp() -> String {
    // web-time keeps this working in the browser as well
    let now = web_time::SystemTime::now();
    let secs = now
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_timestamp(secs)
}

/// Format seconds since the Unix epoch as `YYYY-MM-DDTHH:MM:SSZ`.
fn format_timestamp(secs: u64) -> String {
    let (year, month, day) = days_to_ymd(secs / 86400);
    let secs_today = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        secs_today / 3600,
        (secs_today % 3600) / 60,
        secs_today % 60
    )
}

/// Convert days since Unix epoch to year/month/day.
fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    let mut remaining = days;
    let mut year = 1970;
    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining < days_in_year {
            break;
        }
        remaining -= days_in_year;
        year += 1;
    }

    let february = if is_leap_year(year) { 29 } else { 28 };
    let days_in_months = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1;
    for days_in_month in days_in_months {
        if remaining < days_in_month {
            break;
        }
        remaining -= days_in_month;
        month += 1;
    }

    (year, month, remaining + 1)
}

fn is_leap_year(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use web_time::Instant;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
        // 2024-02-29 12:34:56 UTC
        assert_eq!(format_timestamp(1_709_210_096), "2024-02-29T12:34:56Z");
    }

    #[test]
    fn test_export_idle_session() {
        let session = TriageSession::with_defaults(&WorkflowConfig::default());
        let export = TriageExport::from_session(&session);
        assert_eq!(export.zone_path.as_deref(), Some("Barco 4 - Zona T5"));
        assert_eq!(export.stage, TriageStage::NoBatch);
        assert!(export.upload.items.is_empty());
        assert!(export.finding.is_none());
    }

    #[test]
    fn test_export_open_finding() {
        let mut session = TriageSession::with_defaults(&WorkflowConfig::default());
        let start = Instant::now();
        session
            .start_batch(
                vec![crate::model::MediaItem::new("casco.png", Vec::new())],
                start,
            )
            .unwrap();
        session.tick(start + std::time::Duration::from_secs(5));
        session.confirm().unwrap();
        session.select_category(CategoryId::Deformation).unwrap();
        let image = session.category_images()[2].clone();
        session
            .open_image(CategoryId::Deformation, image, 2)
            .unwrap();

        let export = TriageExport::from_session(&session);
        assert_eq!(export.stage, TriageStage::ImageDetail);
        assert_eq!(export.upload.items, vec!["casco.png"]);
        assert_eq!(export.categories.len(), 4);
        assert_eq!(export.active_category, Some(CategoryId::Deformation));

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["stage"], "image_detail");
        assert_eq!(json["upload"]["status"], "complete");
        assert_eq!(json["categories"][0]["id"], 1);
        assert_eq!(json["finding"]["location"], "Barco 4 - Zona T5");
    }
}
