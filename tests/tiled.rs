use jtilemap::prelude::*;
use jtilemap::tiled::{LayerRef, MapLayer, TiledMap, layer_to_csv};

const MAP: &str = r#"{
    "version": "1.10",
    "orientation": "orthogonal",
    "width": 3,
    "height": 2,
    "tilewidth": 8,
    "tileheight": 8,
    "tilesets": [
        { "name": "terrain", "firstgid": 1,  "tilecount": 4, "tilewidth": 8, "tileheight": 8 },
        { "name": "props",   "firstgid": 5,  "tilecount": 2, "tilewidth": 8, "tileheight": 8 }
    ],
    "layers": [
        { "name": "ground", "type": "tilelayer", "width": 3, "height": 2,
          "data": [1, 2, 0, 4, 5, 3] },
        { "name": "spawns", "type": "objectgroup",
          "objects": [{ "name": "player", "type": "spawn", "x": 8, "y": 4, "width": 8, "height": 8 }] },
        { "name": "deco", "type": "tilelayer", "width": 3, "height": 2,
          "data": [0, 5, 6, 0, 0, 7] }
    ]
}"#;

fn map() -> TiledMap {
    TiledMap::from_json(MAP).unwrap()
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[test]
fn header_and_layers() {
    let map = map();
    assert_eq!(map.version, "1.10");
    assert_eq!((map.width, map.height, map.tile_width, map.tile_height), (3, 2, 8, 8));
    assert_eq!(map.layers().len(), 3);
    assert!(matches!(map.layers()[1], MapLayer::Objects(_)));

    let ground = map.tile_layer("ground").unwrap();
    assert_eq!(ground.tile_gids, vec![vec![1, 2, 0], vec![4, 5, 3]]);
    assert!(map.tile_layer("spawns").is_none());
}

#[test]
fn object_groups_keep_bounds() {
    let map = map();
    let spawns = map.object_group("spawns").unwrap();
    assert_eq!(spawns.objects.len(), 1);
    assert_eq!(spawns.objects[0].kind, "spawn");
    assert_eq!(spawns.objects[0].bounds, Rect::new(8.0, 4.0, 8.0, 8.0));
}

#[test]
fn gid_owner_searches_tilesets() {
    let map = map();
    assert_eq!(map.gid_owner(4).map(|s| s.name.as_str()), Some("terrain"));
    assert_eq!(map.gid_owner(6).map(|s| s.name.as_str()), Some("props"));
    assert_eq!(map.gid_owner(7), None);
    assert_eq!(map.gid_owner(0), None);
}

// ── Layer conversion ──────────────────────────────────────────────────────────

#[test]
fn layer_without_tileset_keeps_gids() {
    let csv = layer_to_csv(&map(), "ground", None).unwrap();
    assert_eq!(csv, "1,2,0\n4,5,3\n");
}

#[test]
fn tileset_offsets_and_clamps_gids() {
    let map = map();
    let props = map.tile_set("props").unwrap();
    let csv = layer_to_csv(&map, "deco", Some(props)).unwrap();
    // 5 and 6 become 0 and 1; 7 is past the set and 0 is below it.
    assert_eq!(csv, "0,0,1\n0,0,0\n");
}

#[test]
fn layer_by_index_counts_object_groups() {
    let map = map();
    assert_eq!(layer_to_csv(&map, 2usize, None).unwrap(), "0,5,6\n0,0,7\n");
    let err = layer_to_csv(&map, 1usize, None).unwrap_err();
    assert!(matches!(err, TilemapError::LayerNotFound(_)));
}

#[test]
fn missing_layer_is_an_error() {
    let err = layer_to_csv(&map(), LayerRef::Name("sky"), None).unwrap_err();
    assert!(matches!(err, TilemapError::LayerNotFound(ref name) if name == "sky"));
}

#[test]
fn tiled_layer_loads_into_tilemap() {
    let map = map();
    let terrain = map.tile_set("terrain").unwrap();
    let csv = layer_to_csv(&map, "ground", Some(terrain)).unwrap();
    let tilemap: Tilemap = Tilemap::load(&csv, TileSheet::new(32, 8), &LoadOptions::default()).unwrap();
    assert_eq!(tilemap.data(), &[0, 1, 0, 3, 0, 2]);
}
