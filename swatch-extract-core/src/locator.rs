//! Nearest-color-label search.
//!
//! Given the placement rectangle of a swatch and the page's word
//! list, find the closest word whose normalized text is a valid color
//! name. Distance is measured center to center; words beyond the
//! proximity bound on either axis are ignored so that a matching word
//! in a far-away header or legend never labels a tile.

use crate::geometry::Rect;
use crate::page::Word;
use crate::taxonomy::normalize;
use std::collections::HashSet;

/// Default center-to-center proximity bound in page units
pub const DEFAULT_PROXIMITY: f32 = 260.0;

/// Find the closest word near `rect` whose normalized text is in
/// `allowed`, and return its raw (original-case) text.
///
/// Both the horizontal and the vertical center offset must be
/// strictly below `proximity` for a word to qualify. Ties keep the
/// first-seen word; exact floating-point ties do not occur in real
/// layouts and are not special-cased.
pub fn nearest_color_label<'a>(
    words: &'a [Word],
    rect: &Rect,
    allowed: &HashSet<String>,
    proximity: f32,
) -> Option<&'a str> {
    let center = rect.center();
    let mut best: Option<(&'a str, f32)> = None;

    for word in words {
        if !allowed.contains(&normalize(&word.text)) {
            continue;
        }
        let word_center = word.rect.center();
        let dx = word_center.x - center.x;
        let dy = word_center.y - center.y;
        if dx.abs() >= proximity || dy.abs() >= proximity {
            continue;
        }
        // Squared distance preserves ordering and avoids the sqrt
        let distance = dx * dx + dy * dy;
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((word.text.trim(), distance)),
        }
    }

    best.map(|(text, _)| text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| normalize(n)).collect()
    }

    fn word_at(text: &str, cx: f32, cy: f32) -> Word {
        Word::new(Rect::new(cx - 20.0, cy - 5.0, cx + 20.0, cy + 5.0), text)
    }

    #[test]
    fn test_finds_nearby_vocabulary_word() {
        let words = vec![word_at("Charcoal", 150.0, 140.0)];
        let rect = Rect::new(50.0, 50.0, 150.0, 150.0); // center (100, 100)
        let allowed = vocabulary(&["Charcoal"]);
        assert_eq!(
            nearest_color_label(&words, &rect, &allowed, DEFAULT_PROXIMITY),
            Some("Charcoal")
        );
    }

    #[test]
    fn test_ignores_word_beyond_proximity_bound() {
        // A vocabulary word exists but sits far away; it must not be
        // used even though nothing closer qualifies.
        let words = vec![word_at("Charcoal", 500.0, 500.0)];
        let rect = Rect::new(50.0, 50.0, 150.0, 150.0);
        let allowed = vocabulary(&["Charcoal"]);
        assert_eq!(
            nearest_color_label(&words, &rect, &allowed, DEFAULT_PROXIMITY),
            None
        );
    }

    #[test]
    fn test_picks_closest_of_several_candidates() {
        let words = vec![
            word_at("Slate", 300.0, 100.0),
            word_at("Barkwood", 120.0, 110.0),
            word_at("Hickory", 200.0, 200.0),
        ];
        let rect = Rect::new(50.0, 50.0, 150.0, 150.0);
        let allowed = vocabulary(&["Slate", "Barkwood", "Hickory"]);
        assert_eq!(
            nearest_color_label(&words, &rect, &allowed, DEFAULT_PROXIMITY),
            Some("Barkwood")
        );
    }

    #[test]
    fn test_skips_words_outside_vocabulary() {
        let words = vec![
            word_at("Premium", 105.0, 100.0),
            word_at("Charcoal", 150.0, 140.0),
        ];
        let rect = Rect::new(50.0, 50.0, 150.0, 150.0);
        let allowed = vocabulary(&["Charcoal"]);
        assert_eq!(
            nearest_color_label(&words, &rect, &allowed, DEFAULT_PROXIMITY),
            Some("Charcoal")
        );
    }

    #[test]
    fn test_matches_ignore_case_and_spacing() {
        let words = vec![word_at("PEWTER  GRAY", 120.0, 100.0)];
        let rect = Rect::new(50.0, 50.0, 150.0, 150.0);
        let allowed = vocabulary(&["Pewter Gray"]);
        // Raw text is returned as rendered in the document
        assert_eq!(
            nearest_color_label(&words, &rect, &allowed, DEFAULT_PROXIMITY),
            Some("PEWTER  GRAY")
        );
    }

    #[test]
    fn test_empty_word_list_yields_none() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let allowed = vocabulary(&["Charcoal"]);
        assert_eq!(
            nearest_color_label(&[], &rect, &allowed, DEFAULT_PROXIMITY),
            None
        );
    }

    #[test]
    fn test_tie_keeps_first_seen_word() {
        let words = vec![
            word_at("Slate", 120.0, 100.0),
            word_at("Hickory", 80.0, 100.0),
        ];
        let rect = Rect::new(50.0, 50.0, 150.0, 150.0);
        let allowed = vocabulary(&["Slate", "Hickory"]);
        assert_eq!(
            nearest_color_label(&words, &rect, &allowed, DEFAULT_PROXIMITY),
            Some("Slate")
        );
    }
}
