/// Native driver for the triage workflow.
///
/// Picks inspection photos with the native file dialog, runs the simulated
/// transfer for the configured zone, logs the classification and offers to
/// save the export.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hull_triage::TriageConfig;
    use hull_triage::logging::init_logging;

    let config = TriageConfig::load_or_default();
    init_logging(config.preferences.log_level);

    // First run: write the defaults so there is a file to edit
    if TriageConfig::default_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = config.save_to_default_path() {
            log::warn!("Failed to write default config: {}", e);
        }
    }

    if let Err(e) = native::run(&config) {
        log::error!("Application error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use hull_triage::export::TriageExport;
    use hull_triage::message::{ClassificationMessage, UploadMessage};
    use hull_triage::model::{IMAGE_EXTENSIONS, MediaItem};
    use hull_triage::{Message, Outcome, TriageConfig, TriageSession, TriageStage, update};
    use web_time::Instant;

    pub fn run(config: &TriageConfig) -> Result<(), String> {
        let mut session = TriageSession::with_defaults(&config.workflow);
        let zone = session
            .selection()
            .and_then(|s| s.path_label(session.fleet()))
            .ok_or("No zone selected; set workflow.initial_selection in the config file")?;
        log::info!("Inspecting {}", zone);

        let Some(paths) = rfd::FileDialog::new()
            .set_title("Select inspection images")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
        else {
            log::info!("No files selected");
            return Ok(());
        };

        let items = read_media(paths);
        let picked = Message::Upload(UploadMessage::FilesPicked(items));
        if let Outcome::Rejected(e) = update(&mut session, picked, Instant::now()) {
            return Err(e.to_string());
        }

        drive_transfer(&mut session);

        if let Outcome::Rejected(e) = update(
            &mut session,
            Message::Upload(UploadMessage::Apply),
            Instant::now(),
        ) {
            return Err(e.to_string());
        }

        for category in session.categories() {
            log::info!(
                "{} ({}): {} findings",
                category.label,
                category.severity.label(),
                category.finding_count
            );
        }
        let busiest = session
            .categories()
            .iter()
            .max_by_key(|c| c.finding_count)
            .map(|c| c.id.as_u32());
        if let Some(id) = busiest {
            let select = Message::Classification(ClassificationMessage::CategorySelected(id));
            update(&mut session, select, Instant::now());
            for image in session.category_images() {
                log::info!("  {} ({})", image.display_name, image.url);
            }
        }

        save_export(&session)
    }

    /// Read picked files into memory, skipping unreadable ones.
    fn read_media(paths: Vec<PathBuf>) -> Vec<MediaItem> {
        paths
            .into_iter()
            .filter_map(|path| match std::fs::read(&path) {
                Ok(data) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.to_string_lossy().into_owned());
                    Some(MediaItem::new(name, data))
                }
                Err(e) => {
                    log::warn!("Failed to read {:?}: {}", path, e);
                    None
                }
            })
            .collect()
    }

    /// Sleep until each tick is due until the transfer leaves `Uploading`.
    fn drive_transfer(session: &mut TriageSession) {
        while session.stage() == TriageStage::Uploading {
            let Some(due) = session.next_tick_due() else {
                break;
            };
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
            session.tick(Instant::now());
            log::info!("{}", session.ingestion().summary());
        }
    }

    fn save_export(session: &TriageSession) -> Result<(), String> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Export triage data")
            .set_file_name(TriageExport::default_filename())
            .save_file()
        else {
            return Ok(());
        };

        let json = TriageExport::from_session(session)
            .to_json()
            .map_err(|e| format!("Failed to serialize export: {}", e))?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
        log::info!("Saved export to {:?}", path);
        Ok(())
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
