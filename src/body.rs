use crate::geometry::Rect;

/// Anything with a world-space bounding box that can be tested against a tilemap.
///
/// `Kind` is the caller's own object classification (usually a small `enum`).
/// Tile callbacks registered with a filter only fire for objects whose kind
/// the filter accepts.
pub trait Body {
    type Kind: Copy;

    /// World-space bounds of the object at its current position.
    fn bounds(&self) -> Rect;

    /// Classification used by per-tile callback filters.
    fn kind(&self) -> Self::Kind;
}

/// A bare rectangle is a body with no particular kind.
impl Body for Rect {
    type Kind = ();

    fn bounds(&self) -> Rect {
        *self
    }

    fn kind(&self) {}
}
