use std::cell::Cell;
use std::rc::Rc;

use jtilemap::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Kind {
    Player,
    Bullet,
}

struct Actor {
    rect: Rect,
    kind: Kind,
}

impl Actor {
    fn new(x: f32, y: f32, kind: Kind) -> Self {
        Self { rect: Rect::new(x, y, 4.0, 4.0), kind }
    }
}

impl Body for Actor {
    type Kind = Kind;

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn kind(&self) -> Kind {
        self.kind
    }
}

/// 3×2 map over a sheet with three 8×8 graphics.  Type 2 sits at (1, 0),
/// a wall (type 1) at (1, 1).
fn map() -> Tilemap<Kind> {
    Tilemap::load("0,2,0\n0,1,0", TileSheet::new(24, 8), &LoadOptions::default()).unwrap()
}

fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let hits = Rc::new(Cell::new(0));
    (hits.clone(), hits)
}

// ── Plain overlap ─────────────────────────────────────────────────────────────

#[test]
fn overlap_needs_strict_intersection() {
    let map = map();
    assert!(map.overlaps(&mut Actor::new(6.0, 10.0, Kind::Player)));
    // Touching the wall's left edge only.
    assert!(!map.overlaps(&mut Actor::new(4.0, 10.0, Kind::Player)));
}

#[test]
fn group_overlap_tests_every_member() {
    let mut map = map();
    let (hits, seen) = counter();
    map.set_tile_properties(
        1,
        CollisionFlags::ANY,
        Some(tile_callback(move |_, _| hits.set(hits.get() + 1))),
        None,
        1,
    );
    let mut group = [Actor::new(9.0, 9.0, Kind::Player), Actor::new(10.0, 10.0, Kind::Bullet)];
    assert!(map.overlaps_any(&mut group));
    assert_eq!(seen.get(), 2);
}

// ── Tile callbacks ────────────────────────────────────────────────────────────

#[test]
fn trigger_tile_fires_without_colliding() {
    let mut map = map();
    let (hits, seen) = counter();
    map.set_tile_properties(
        2,
        CollisionFlags::NONE,
        Some(tile_callback(move |contact, _| {
            assert_eq!(contact.map_index, 1);
            hits.set(hits.get() + 1);
        })),
        None,
        1,
    );

    // In range of the trigger cell but nowhere near it geometrically.
    let hit = map.overlaps(&mut Actor::new(0.0, 0.0, Kind::Player));
    assert!(!hit);
    assert_eq!(seen.get(), 1);
}

#[test]
fn filter_limits_callback_to_kind() {
    let mut map = map();
    let (hits, seen) = counter();
    map.set_tile_properties(
        1,
        CollisionFlags::ANY,
        Some(tile_callback(move |_, body| {
            assert_eq!(body.kind(), Kind::Player);
            hits.set(hits.get() + 1);
        })),
        Some(tile_filter(|kind| kind == Kind::Player)),
        1,
    );

    assert!(map.overlaps(&mut Actor::new(10.0, 10.0, Kind::Bullet)));
    assert_eq!(seen.get(), 0);
    assert!(map.overlaps(&mut Actor::new(10.0, 10.0, Kind::Player)));
    assert_eq!(seen.get(), 1);
}

#[test]
fn solid_tile_callback_needs_overlap() {
    let mut map = map();
    let (hits, seen) = counter();
    map.set_tile_properties(1, CollisionFlags::ANY, Some(tile_callback(move |_, _| hits.set(hits.get() + 1))), None, 1);
    assert!(!map.overlaps(&mut Actor::new(0.0, 12.0, Kind::Player)));
    assert_eq!(seen.get(), 0);
}

// ── Injected callback ─────────────────────────────────────────────────────────

#[test]
fn injected_callback_can_move_the_object() {
    let map = map();
    let mut actor = Actor::new(9.0, 10.0, Kind::Player);
    let mut push_up = |overlap: Overlap<'_, Actor>| match overlap {
        Overlap::TileFirst(contact, actor) => {
            if !actor.rect.overlaps(&contact.rect) {
                return false;
            }
            actor.rect.y = contact.rect.y - actor.rect.height;
            true
        }
        Overlap::ObjectFirst(..) => unreachable!("flip was not requested"),
    };

    assert!(map.overlaps_with_callback(&mut actor, None, Some(&mut push_up), false));
    assert_eq!(actor.rect.y, 4.0);
    assert!(!actor.rect.overlaps(&Rect::new(8.0, 8.0, 8.0, 8.0)));
}

#[test]
fn overlaps_point_checks_containing_cell() {
    let mut map = map();
    assert!(map.overlaps_point(Vec2::new(12.0, 12.0)));
    assert!(!map.overlaps_point(Vec2::new(4.0, 4.0)));

    map.set_position(Vec2::new(-8.0, 0.0));
    assert!(map.overlaps_point(Vec2::new(4.0, 12.0)));
    assert!(!map.overlaps_point(Vec2::new(-9.0, 12.0)));
}
