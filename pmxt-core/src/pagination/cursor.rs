//! Opaque pagination cursors.
//!
//! A cursor is URL-safe, unpadded base64 over a small JSON object naming a
//! snapshot and an offset into it. Callers must treat it as opaque.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Decoded cursor contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    /// Snapshot the cursor points into
    pub snapshot_id: String,
    /// Index of the first market on the page
    pub offset: usize,
}

/// Encodes and decodes cursor tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorCodec;

impl CursorCodec {
    /// Encodes a position into a cursor token.
    pub fn encode(snapshot_id: &str, offset: usize) -> String {
        let payload = serde_json::json!({
            "snapshotId": snapshot_id,
            "offset": offset,
        });
        URL_SAFE_NO_PAD.encode(payload.to_string())
    }

    /// Decodes a cursor token, failing with `InvalidCursor` on anything malformed.
    pub fn decode(cursor: &str) -> Result<CursorPosition> {
        if cursor.is_empty() {
            return Err(Error::invalid_cursor(cursor, "empty cursor"));
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor.trim_end_matches('='))
            .map_err(|_| Error::invalid_cursor(cursor, "not valid base64url"))?;
        let position: CursorPosition = serde_json::from_slice(&bytes)
            .map_err(|e| Error::invalid_cursor(cursor, format!("malformed payload: {e}")))?;
        if position.snapshot_id.is_empty() {
            return Err(Error::invalid_cursor(cursor, "missing snapshot id"));
        }
        Ok(position)
    }
}
