use std::collections::{BTreeMap, HashMap};

use crate::Codepoint;

/// Bitmap rows, top row first; nonzero cells are on.
pub type Rows = Vec<Vec<u8>>;

/// One glyph entry of a character table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Character {
    pub codepoint: Codepoint,
    pub name: String,
    pub pixels: Option<Rows>,
    /// Rows below the baseline. Fractional parts become a vertical offset
    /// of the emitted outline rather than a pixel shift.
    pub descent: Option<f32>,
    /// Character whose composed image is merged into this one.
    pub reference: Option<Codepoint>,
    /// Name of a mark placed above the highest on row.
    pub diacritic: Option<String>,
    /// Extra empty rows between the base and the mark.
    pub diacritic_space: i32,
}

impl Character {
    pub fn new(codepoint: Codepoint, name: impl Into<String>) -> Self {
        Self {
            codepoint,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_pixels(mut self, rows: Rows) -> Self {
        self.pixels = Some(rows);
        self
    }

    pub fn with_descent(mut self, descent: f32) -> Self {
        self.descent = Some(descent);
        self
    }

    pub fn with_reference(mut self, codepoint: Codepoint) -> Self {
        self.reference = Some(codepoint);
        self
    }

    pub fn with_diacritic(mut self, name: impl Into<String>, space: i32) -> Self {
        self.diacritic = Some(name.into());
        self.diacritic_space = space;
        self
    }
}

/// Characters by codepoint plus named diacritic bitmaps.
#[derive(Debug, Clone, Default)]
pub struct CharacterTable {
    characters: BTreeMap<Codepoint, Character>,
    diacritics: HashMap<String, Rows>,
}

impl CharacterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for `ch.codepoint`.
    pub fn insert(&mut self, ch: Character) -> Option<Character> {
        self.characters.insert(ch.codepoint, ch)
    }

    pub fn insert_diacritic(&mut self, name: impl Into<String>, rows: Rows) -> Option<Rows> {
        self.diacritics.insert(name.into(), rows)
    }

    pub fn get(&self, codepoint: Codepoint) -> Option<&Character> {
        self.characters.get(&codepoint)
    }

    pub fn diacritic(&self, name: &str) -> Option<&Rows> {
        self.diacritics.get(name)
    }

    /// Characters in codepoint order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl FromIterator<Character> for CharacterTable {
    fn from_iter<I: IntoIterator<Item = Character>>(iter: I) -> Self {
        let mut table = Self::new();
        for ch in iter {
            table.insert(ch);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::{Character, CharacterTable};

    #[test]
    fn later_insert_replaces_entry() {
        let mut table: CharacterTable = [Character::new(65, "A"), Character::new(66, "B")]
            .into_iter()
            .collect();

        let old = table.insert(Character::new(65, "A.alt"));
        assert_eq!(old.map(|c| c.name), Some("A".to_string()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(65).map(|c| c.name.as_str()), Some("A.alt"));
        assert!(table.get(67).is_none());
    }

    #[test]
    fn iteration_follows_codepoints() {
        let table: CharacterTable = [200, 65, 97]
            .into_iter()
            .map(|cp| Character::new(cp, format!("u{cp}")))
            .collect();

        let order: Vec<_> = table.iter().map(|c| c.codepoint).collect();
        assert_eq!(order, vec![65, 97, 200]);
    }

    #[test]
    fn diacritics_are_looked_up_by_name() {
        let mut table = CharacterTable::new();
        assert!(table.insert_diacritic("acute", vec![vec![0, 1], vec![1, 0]]).is_none());
        assert_eq!(table.diacritic("acute").map(|r| r.len()), Some(2));
        assert!(table.diacritic("grave").is_none());
    }
}
