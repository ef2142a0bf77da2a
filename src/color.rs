//! Stable category colors.
//!
//! A category's color is a pure function of its name, so every view (and
//! every recomputation) agrees on it without sharing any state.

use std::collections::HashMap;

use crate::domain::{Category, Color};

const BRIGHTEN_FACTOR: f64 = 1.2;

/// Derives the display color for a category name.
pub fn assign_color(category: &str) -> Color {
    let hash = name_hash(category);
    Color::rgb(
        brighten(channel(hash, 0)),
        brighten(channel(hash, 8)),
        brighten(channel(hash, 16)),
    )
}

/// `hash * 31 + c` over the UTF-16 code units, wrapping at 32 bits.
fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

// Masking after the arithmetic shift keeps negative hashes in 0..=255.
fn channel(hash: i32, shift: u32) -> u8 {
    ((hash >> shift) & 0xFF) as u8
}

fn brighten(value: u8) -> u8 {
    (f64::from(value) * BRIGHTEN_FACTOR).floor().min(255.0) as u8
}

/// The authoritative category list with its derived colors.
#[derive(Debug, Clone, Default)]
pub struct CategoryPalette {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryPalette {
    /// Builds a palette in the given order. Repeated names keep their first
    /// position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut palette = Self::default();
        for name in names {
            let name = name.into();
            if palette.index.contains_key(&name) {
                continue;
            }
            palette.index.insert(name.clone(), palette.categories.len());
            palette.categories.push(Category {
                color: assign_color(&name),
                name,
            });
        }
        palette
    }

    pub fn color_of(&self, name: &str) -> Option<Color> {
        self.index
            .get(name)
            .map(|position| self.categories[*position].color)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryPalette, assign_color};

    #[test]
    fn empty_name_is_black() {
        assert_eq!(assign_color("").to_string(), "#000000");
    }

    #[test]
    fn single_letter_matches_reference_value() {
        assert_eq!(assign_color("A").to_string(), "#4e0000");
    }

    #[test]
    fn negative_hash_still_yields_valid_channels() {
        // "Puzzle" wraps past i32::MAX.
        assert_eq!(assign_color("Puzzle").to_string(), "#70e136");
        assert_eq!(assign_color("Combat").to_string(), "#18ffc3");
        assert_eq!(assign_color("Racing Games").to_string(), "#858520");
    }

    #[test]
    fn assignment_is_deterministic() {
        for name in ["", "A", "Combat", "Strategy", "日本語", "a much longer category name"] {
            assert_eq!(assign_color(name), assign_color(name));
        }
    }

    #[test]
    fn palette_keeps_order_and_first_occurrence() {
        let palette = CategoryPalette::from_names(["Combat", "Puzzle", "Combat", "Racing"]);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.names(), vec!["Combat", "Puzzle", "Racing"]);
        assert_eq!(palette.color_of("Puzzle"), Some(assign_color("Puzzle")));
        assert_eq!(palette.color_of("Unknown"), None);
    }

    #[test]
    fn palette_colors_do_not_depend_on_neighbours() {
        let alone = CategoryPalette::from_names(["Combat"]);
        let crowded = CategoryPalette::from_names(["Puzzle", "Racing", "Combat"]);
        assert_eq!(alone.color_of("Combat"), crowded.color_of("Combat"));
    }
}
