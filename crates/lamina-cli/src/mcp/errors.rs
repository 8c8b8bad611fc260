//! Error handling utilities for MCP server

use lamina_core::WorkshopError;
use rmcp::ErrorData;

/// Helper to convert workshop errors to MCP errors.
///
/// Caller mistakes (failed step validation, bad input, missing IDs,
/// insufficient role) map to `invalid_params` so clients can tell a
/// recoverable request problem from a server fault; everything else is an
/// internal error.
pub fn to_mcp_error(message: &str, error: &WorkshopError) -> ErrorData {
    let detail = format!("{}: {}", message, error);
    match error {
        WorkshopError::ValidationFailed { .. }
        | WorkshopError::InvalidInput { .. }
        | WorkshopError::PermissionDenied { .. }
        | WorkshopError::TaskNotFound { .. }
        | WorkshopError::InterventionNotFound { .. }
        | WorkshopError::StepNotFound { .. } => ErrorData::invalid_params(detail, None),
        _ => ErrorData::internal_error(detail, None),
    }
}
