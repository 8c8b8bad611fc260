//! Photo model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::PhotoKind;

/// An attachment tracked by storage path only; Lamina never touches the
/// file itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    /// Unique identifier for the photo
    pub id: u64,

    /// ID of the owning task
    pub task_id: u64,

    /// Optional intervention association
    pub intervention_id: Option<u64>,

    /// Optional step association
    pub step_id: Option<u64>,

    /// Before/during/after tag
    pub kind: PhotoKind,

    /// Storage path or URL
    pub path: String,

    /// Optional free-text caption
    pub caption: Option<String>,

    /// Timestamp when the photo was registered (UTC)
    pub created_at: Timestamp,
}
