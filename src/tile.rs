use std::rc::Rc;

use bitflags::bitflags;
use glam::Vec2;

use crate::body::Body;
use crate::collision::TileContact;

bitflags! {
    /// Directions a tile blocks movement from.  Empty means passable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CollisionFlags: u16 {
        const LEFT  = 0x0001;
        const RIGHT = 0x0010;
        const UP    = 0x0100;
        const DOWN  = 0x1000;
        const ANY   = Self::LEFT.bits() | Self::RIGHT.bits() | Self::UP.bits() | Self::DOWN.bits();
    }
}

impl CollisionFlags {
    pub const NONE: Self = Self::empty();

    /// True if the tile blocks from at least one direction.
    #[inline]
    pub fn is_solid(self) -> bool {
        !self.is_empty()
    }
}

/// Called when an object touches a tile of a given type.
pub type TileCallback<K> = Rc<dyn Fn(&TileContact, &dyn Body<Kind = K>)>;

/// Decides which object kinds a [`TileCallback`] fires for.
pub type TileFilter<K> = Rc<dyn Fn(K) -> bool>;

/// Wrap a closure as a [`TileCallback`].
pub fn tile_callback<K, F>(f: F) -> TileCallback<K>
where
    K: Copy + 'static,
    F: Fn(&TileContact, &dyn Body<Kind = K>) + 'static,
{
    Rc::new(f)
}

/// Wrap a predicate as a [`TileFilter`].
pub fn tile_filter<K, F>(f: F) -> TileFilter<K>
where
    K: Copy + 'static,
    F: Fn(K) -> bool + 'static,
{
    Rc::new(f)
}

// ── TileType ─────────────────────────────────────────────────────────────────

/// Shared properties of every cell holding the same tile-type id.
pub struct TileType<K: Copy + 'static> {
    /// Index into the registry; also selects the graphic in the sheet.
    pub id: u32,
    pub visible: bool,
    pub allow_collisions: CollisionFlags,
    /// Pixel offset applied to this tile's collision rectangle.
    pub offset: Vec2,
    callback: Option<TileCallback<K>>,
    filter: Option<TileFilter<K>>,
}

impl<K: Copy + 'static> TileType<K> {
    fn new(id: u32, visible: bool, allow_collisions: CollisionFlags) -> Self {
        Self {
            id,
            visible,
            allow_collisions,
            offset: Vec2::ZERO,
            callback: None,
            filter: None,
        }
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// True if a callback is registered and its filter (if any) accepts `kind`.
    pub fn triggers_for(&self, kind: K) -> bool {
        self.callback.is_some() && self.filter.as_ref().is_none_or(|accept| accept(kind))
    }

    pub(crate) fn fire(&self, contact: &TileContact, object: &dyn Body<Kind = K>) {
        if let Some(callback) = &self.callback {
            callback(contact, object);
        }
    }
}

impl<K: Copy + 'static> std::fmt::Debug for TileType<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileType")
            .field("id", &self.id)
            .field("visible", &self.visible)
            .field("allow_collisions", &self.allow_collisions)
            .field("offset", &self.offset)
            .field("callback", &self.callback.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

// ── TileRegistry ─────────────────────────────────────────────────────────────

/// Fixed-size table of tile types, indexed by tile-type id.
///
/// Sized once at load time and never resized; only the per-type properties
/// change afterwards.
#[derive(Debug)]
pub struct TileRegistry<K: Copy + 'static> {
    types: Vec<TileType<K>>,
}

impl<K: Copy + 'static> TileRegistry<K> {
    /// Build `count` tile types.  Ids below `draw_index` are invisible, ids
    /// below `collide_index` are passable, the rest collide from every side.
    pub fn build(count: usize, draw_index: u32, collide_index: u32) -> Self {
        let types = (0..count as u32)
            .map(|id| {
                let collisions = if id >= collide_index {
                    CollisionFlags::ANY
                } else {
                    CollisionFlags::NONE
                };
                TileType::new(id, id >= draw_index, collisions)
            })
            .collect();
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&TileType<K>> {
        self.types.get(id as usize)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut TileType<K>> {
        self.types.get_mut(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileType<K>> {
        self.types.iter()
    }

    /// Set collisions, callback and filter for `range` consecutive types
    /// starting at `first`.  A `range` of `0` is treated as `1`; ids past the
    /// end of the registry are ignored.
    pub fn set_properties(
        &mut self,
        first: u32,
        allow_collisions: CollisionFlags,
        callback: Option<TileCallback<K>>,
        filter: Option<TileFilter<K>>,
        range: u32,
    ) {
        let range = range.max(1);
        let start = first as usize;
        let end = start.saturating_add(range as usize);
        if end > self.types.len() {
            log::warn!(
                "tile properties for ids {start}..{end} exceed the {} registered types; clipping",
                self.types.len()
            );
        }
        for tile in self.types.iter_mut().take(end).skip(start) {
            tile.allow_collisions = allow_collisions;
            tile.callback = callback.clone();
            tile.filter = filter.clone();
        }
    }
}

impl<K: Copy + 'static> std::ops::Index<u32> for TileRegistry<K> {
    type Output = TileType<K>;

    fn index(&self, id: u32) -> &TileType<K> {
        &self.types[id as usize]
    }
}
