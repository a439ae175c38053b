//! Shared numeric constants for the diagram core.

// ── Snapping ────────────────────────────────────────────────────

/// Default maximum distance (exclusive) at which an endpoint attaches to an anchor.
pub const SNAP_THRESHOLD: f64 = 15.0;

// ── Routing ─────────────────────────────────────────────────────

/// Coordinate difference below which two points count as axis-aligned.
pub const ALIGN_TOLERANCE: f64 = 0.5;

// ── History ─────────────────────────────────────────────────────

/// Default number of undo snapshots retained before the oldest is evicted.
pub const HISTORY_DEPTH: usize = 50;

// ── Identity ────────────────────────────────────────────────────

/// Largest shape id a drawing accepts, the top of the exact JSON integer range.
pub const MAX_SHAPE_ID: u64 = (1 << 53) - 1;

// ── Editing ─────────────────────────────────────────────────────

/// Offset applied to each axis when a copied shape is pasted.
pub const PASTE_OFFSET: f64 = 20.0;

/// Smallest radius a circle or ellipse can be resized to.
pub const MIN_RADIUS: f64 = 5.0;

/// Format version written to and accepted from persisted drawings.
pub const FORMAT_VERSION: &str = "1.0";
