//! Global constants for the triage workflow

/// Percentage added to the upload progress on every tick
pub const DEFAULT_PROGRESS_STEP: u8 = 10;

/// Milliseconds between two simulated transfer ticks
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 200;

/// Upload progress value at which a batch is complete
pub const PROGRESS_COMPLETE: u8 = 100;

/// Ship expanded in the asset tree when a session opens
pub const DEFAULT_EXPANDED_ASSET: &str = "ship-4";

/// Zone selected when a session opens
pub const DEFAULT_SELECTED_ZONE: (&str, &str) = ("ship-4", "t5");

/// Rendering used for any detail field that can no longer be resolved
pub const UNKNOWN_FIELD: &str = "unknown";

/// Separator between asset and zone names in a zone path label
pub const ZONE_PATH_SEPARATOR: &str = " - ";

/// Placeholder values shown in the inspection detail panel.
///
/// There is no inspection record behind a finding yet, so the detail view
/// always shows these fixed values.
pub mod detail {
    /// Inspection date shown for every finding
    pub const INSPECTION_DATE: &str = "15 Dic 2024";

    /// Inspector shown for every finding
    pub const INSPECTOR: &str = "Carlos Méndez";

    /// Free-text observations attached to every finding
    pub const OBSERVATIONS: &str = "Se detectó daño estructural que requiere atención. \
        Se recomienda realizar seguimiento y evaluar la necesidad de reparación en el corto plazo.";

    /// Affected surface area in square meters
    pub const AFFECTED_AREA_M2: f32 = 0.42;

    /// Maximum damage depth in millimeters
    pub const MAX_DEPTH_MM: f32 = 3.2;
}
