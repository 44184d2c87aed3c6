use serde::Serialize;

/// Acknowledgement returned when no response rule matched.
#[derive(Debug, Serialize)]
pub struct CaptureAccepted {
    pub id: String,
    pub stored: bool,
}
