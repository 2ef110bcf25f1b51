use structures::CanvasState;

use crate::errors::ImportError;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope<'a> {
    #[serde(flatten)]
    state: &'a CanvasState,
    export_time: i64,
    version: &'static str,
}

/// Pretty JSON of `state`, stamped with the export time in milliseconds.
pub fn export_state(state: &CanvasState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ExportEnvelope {
        state,
        export_time: chrono::Utc::now().timestamp_millis(),
        version: EXPORT_VERSION,
    })
}

/// Parses an exported state. Envelope fields are ignored; the grid is not validated.
pub fn import_state(json: &str) -> Result<CanvasState, ImportError> {
    Ok(serde_json::from_str(json)?)
}
