// =============================================================================
// TILED.RS: Tiled JSON maps
//
// A read-only model of a map exported from the Tiled editor as JSON, and the
// conversion of one of its tile layers into level text.
// - Tile layers are exposed as rows of global tile ids (GIDs)
// - Object groups keep their objects with name, type and bounds
// - Only uncompressed array `data` is understood
// =============================================================================

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, TilemapError};
use crate::geometry::Rect;

// ── Raw JSON shapes ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawMap {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    orientation: Option<String>,
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    properties: Option<RawProperties>,
    #[serde(default)]
    tilesets: Vec<RawTileSet>,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProperties {
    List(Vec<RawProperty>),
    Map(HashMap<String, Value>),
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct RawTileSet {
    #[serde(default)]
    name: String,
    firstgid: u32,
    #[serde(default)]
    tilecount: Option<u32>,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
}

#[derive(Deserialize)]
struct RawLayer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    data: Option<Vec<u32>>,
    #[serde(default)]
    objects: Option<Vec<RawObject>>,
}

#[derive(Deserialize)]
struct RawObject {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

// ── Public model ──────────────────────────────────────────────────────────────

/// A tileset reference: which GIDs it owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSet {
    pub name: String,
    pub first_gid: u32,
    pub num_tiles: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl TileSet {
    fn from_raw(raw: RawTileSet) -> Self {
        let num_tiles = raw.tilecount.unwrap_or_else(|| {
            if raw.tilewidth == 0 || raw.tileheight == 0 {
                0
            } else {
                (raw.imagewidth / raw.tilewidth) * (raw.imageheight / raw.tileheight)
            }
        });
        Self {
            name: raw.name,
            first_gid: raw.firstgid,
            num_tiles,
            tile_width: raw.tilewidth,
            tile_height: raw.tileheight,
        }
    }

    pub fn has_gid(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.num_tiles
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    /// GIDs row by row.
    pub tile_gids: Vec<Vec<u32>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapObject {
    pub name: String,
    pub kind: String,
    pub bounds: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<MapObject>,
}

/// A map layer, in file order.
#[derive(Clone, Debug, PartialEq)]
pub enum MapLayer {
    Tiles(TileLayer),
    Objects(ObjectGroup),
}

impl MapLayer {
    pub fn name(&self) -> &str {
        match self {
            MapLayer::Tiles(layer) => &layer.name,
            MapLayer::Objects(group) => &group.name,
        }
    }
}

/// Picks a layer either by tile-layer name or by position in the full
/// layer list (object groups included).
#[derive(Copy, Clone, Debug)]
pub enum LayerRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for LayerRef<'a> {
    fn from(name: &'a str) -> Self {
        LayerRef::Name(name)
    }
}

impl From<usize> for LayerRef<'_> {
    fn from(index: usize) -> Self {
        LayerRef::Index(index)
    }
}

impl std::fmt::Display for LayerRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerRef::Name(name) => write!(f, "{name}"),
            LayerRef::Index(index) => write!(f, "#{index}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TiledMap {
    pub version: String,
    pub orientation: String,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub properties: HashMap<String, Value>,
    tile_sets: Vec<TileSet>,
    layers: Vec<MapLayer>,
}

impl TiledMap {
    /// Parse a map exported from Tiled in JSON format.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawMap = serde_json::from_str(json)?;

        let version = match raw.version {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => "unknown".to_string(),
        };

        let properties = match raw.properties {
            Some(RawProperties::List(list)) => list.into_iter().map(|p| (p.name, p.value)).collect(),
            Some(RawProperties::Map(map)) => map,
            None => HashMap::new(),
        };

        let mut layers = Vec::with_capacity(raw.layers.len());
        for layer in raw.layers {
            if let Some(data) = layer.data {
                let width = if layer.width > 0 { layer.width } else { raw.width };
                let tile_gids = data.chunks(width.max(1) as usize).map(<[u32]>::to_vec).collect();
                layers.push(MapLayer::Tiles(TileLayer { name: layer.name, width, tile_gids }));
            } else if let Some(objects) = layer.objects {
                let objects = objects
                    .into_iter()
                    .map(|o| MapObject {
                        name: o.name,
                        kind: o.kind,
                        bounds: Rect::new(o.x, o.y, o.width, o.height),
                    })
                    .collect();
                layers.push(MapLayer::Objects(ObjectGroup { name: layer.name, objects }));
            } else {
                log::debug!("tiled layer '{}' has neither data nor objects; skipping", layer.name);
            }
        }

        Ok(Self {
            version,
            orientation: raw.orientation.unwrap_or_else(|| "orthogonal".to_string()),
            width: raw.width,
            height: raw.height,
            tile_width: raw.tilewidth,
            tile_height: raw.tileheight,
            properties,
            tile_sets: raw.tilesets.into_iter().map(TileSet::from_raw).collect(),
            layers,
        })
    }

    pub fn tile_sets(&self) -> &[TileSet] {
        &self.tile_sets
    }

    pub fn tile_set(&self, name: &str) -> Option<&TileSet> {
        self.tile_sets.iter().find(|set| set.name == name)
    }

    /// All layers in file order, object groups included.
    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// Tile layer by name.
    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find_map(|layer| match layer {
            MapLayer::Tiles(tiles) if tiles.name == name => Some(tiles),
            _ => None,
        })
    }

    pub fn object_group(&self, name: &str) -> Option<&ObjectGroup> {
        self.layers.iter().find_map(|layer| match layer {
            MapLayer::Objects(group) if group.name == name => Some(group),
            _ => None,
        })
    }

    /// The tileset that owns `gid`, searching in file order.
    pub fn gid_owner(&self, gid: u32) -> Option<&TileSet> {
        self.tile_sets.iter().find(|set| set.has_gid(gid))
    }
}

/// Convert a tile layer to level text.
///
/// With a tileset, GIDs are made local to it (`gid - first_gid`) and anything
/// outside `0..num_tiles` becomes `0`.  Without one, GIDs are written as-is
/// up to `0xFFFFFF`.  Every row, the last included, ends in `\n`.
pub fn layer_to_csv<'a>(
    map: &TiledMap,
    layer: impl Into<LayerRef<'a>>,
    tile_set: Option<&TileSet>,
) -> Result<String> {
    let layer = layer.into();
    let tiles = match layer {
        LayerRef::Name(name) => map.tile_layer(name),
        LayerRef::Index(index) => match map.layers().get(index) {
            Some(MapLayer::Tiles(tiles)) => Some(tiles),
            _ => None,
        },
    }
    .ok_or_else(|| TilemapError::LayerNotFound(layer.to_string()))?;

    let (offset, max) = match tile_set {
        Some(set) => (set.first_gid as i64, set.num_tiles as i64 - 1),
        None => (0, 0xFF_FFFF),
    };

    let mut csv = String::new();
    for row in &tiles.tile_gids {
        let fields: Vec<String> = row
            .iter()
            .map(|&gid| {
                let id = gid as i64 - offset;
                let id = if (0..=max).contains(&id) { id } else { 0 };
                id.to_string()
            })
            .collect();
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    Ok(csv)
}
