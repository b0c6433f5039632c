//! Static environment and landing detection.
//!
//! The level is a short inline list of axis-aligned rectangles. Only their top
//! edges matter: the player is a point that can land on a blocking rectangle
//! while falling through its top edge. There is no side or ceiling collision.
//!
//! Screen coordinates are used throughout: origin top-left, y grows downward,
//! so a rectangle's top edge is `rect.y` and falling means positive speed.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn spans_x(&self, x: f32) -> bool {
        self.x <= x && self.x + self.width >= x
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvItem {
    pub rect: Rect,
    pub blocking: bool,
    /// sRGB, 8 bits per channel.
    pub color: [u8; 4],
}

/// How to choose between several rectangles crossed in the same frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResolution {
    /// Stop at the first match in list order, even if a later rectangle is
    /// closer to the player. Correct only when items are sorted top to bottom.
    #[default]
    FirstMatch,
    /// Land on the match whose top edge is closest to the player.
    NearestSurface,
}

/// Default level: one floor spanning the lower third of the screen.
pub fn default_level(screen_height: u32) -> Vec<EnvItem> {
    vec![EnvItem {
        rect: Rect {
            x: 0.0,
            y: screen_height as f32 / 1.5,
            width: 1000.0,
            height: 200.0,
        },
        blocking: true,
        color: [245, 245, 245, 255],
    }]
}

/// Whether a point at `(x, y)` moving `dy` this frame reaches the top edge of
/// `item`. Resting exactly on the edge with `dy == 0` counts as a hit.
pub fn crosses_top(item: &EnvItem, x: f32, y: f32, dy: f32) -> bool {
    item.blocking && item.rect.spans_x(x) && item.rect.y >= y && item.rect.y <= y + dy
}

/// Index of the item the player lands on this frame, if any.
pub fn find_landing(
    items: &[EnvItem],
    x: f32,
    y: f32,
    dy: f32,
    resolution: CollisionResolution,
) -> Option<usize> {
    let mut hits = items
        .iter()
        .enumerate()
        .filter(|(_, item)| crosses_top(item, x, y, dy));

    match resolution {
        CollisionResolution::FirstMatch => hits.next().map(|(i, _)| i),
        CollisionResolution::NearestSurface => hits
            .fold(None::<(usize, f32)>, |best, (i, item)| {
                let distance = item.rect.y - y;
                match best {
                    Some((_, best_distance)) if best_distance <= distance => best,
                    _ => Some((i, distance)),
                }
            })
            .map(|(i, _)| i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(x: f32, y: f32, width: f32, blocking: bool) -> EnvItem {
        EnvItem {
            rect: Rect {
                x,
                y,
                width,
                height: 10.0,
            },
            blocking,
            color: [0, 0, 0, 255],
        }
    }

    #[test]
    fn default_level_places_floor_at_two_thirds() {
        let level = default_level(480);
        assert_eq!(level.len(), 1);
        assert!((level[0].rect.y - 320.0).abs() < 1e-4);
        assert!(level[0].blocking);
    }

    #[test]
    fn resting_on_edge_counts_as_hit() {
        let floor = item(0.0, 100.0, 50.0, true);
        assert!(crosses_top(&floor, 10.0, 100.0, 0.0));
    }

    #[test]
    fn span_edges_are_inclusive() {
        let floor = item(0.0, 100.0, 50.0, true);
        assert!(crosses_top(&floor, 0.0, 99.0, 5.0));
        assert!(crosses_top(&floor, 50.0, 99.0, 5.0));
        assert!(!crosses_top(&floor, 50.1, 99.0, 5.0));
    }

    #[test]
    fn rising_player_never_lands() {
        let floor = item(0.0, 100.0, 50.0, true);
        assert!(!crosses_top(&floor, 10.0, 99.0, -5.0));
    }

    #[test]
    fn non_blocking_items_are_ignored() {
        let deco = item(0.0, 100.0, 50.0, false);
        assert!(!crosses_top(&deco, 10.0, 99.0, 5.0));
        assert_eq!(
            find_landing(&[deco], 10.0, 99.0, 5.0, CollisionResolution::FirstMatch),
            None
        );
    }

    #[test]
    fn first_match_follows_list_order() {
        // Lower platform listed first wins even though the upper one is closer.
        let items = [item(0.0, 110.0, 50.0, true), item(0.0, 102.0, 50.0, true)];
        assert_eq!(
            find_landing(&items, 10.0, 100.0, 20.0, CollisionResolution::FirstMatch),
            Some(0)
        );
    }

    #[test]
    fn nearest_surface_picks_closest_top() {
        let items = [item(0.0, 110.0, 50.0, true), item(0.0, 102.0, 50.0, true)];
        assert_eq!(
            find_landing(&items, 10.0, 100.0, 20.0, CollisionResolution::NearestSurface),
            Some(1)
        );
    }

    #[test]
    fn nearest_surface_ties_keep_list_order() {
        let items = [item(0.0, 105.0, 50.0, true), item(0.0, 105.0, 50.0, true)];
        assert_eq!(
            find_landing(&items, 10.0, 100.0, 20.0, CollisionResolution::NearestSurface),
            Some(0)
        );
    }

    #[test]
    fn empty_level_has_no_landing() {
        assert_eq!(
            find_landing(&[], 10.0, 100.0, 20.0, CollisionResolution::FirstMatch),
            None
        );
    }
}
