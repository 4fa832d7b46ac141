//! Material catalogue and per-call material palette.
//!
//! The catalogue supplies default hull colors for the material tiers. The
//! palette interns material names into [`MaterialId`]s in first-seen order,
//! so identical inputs always produce identical ids.

use std::collections::HashMap;

use crate::core::MaterialId;

/// Pack an RGBA color as 0xRRGGBBAA.
#[inline]
pub const fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32
}

/// Unpack a 0xRRGGBBAA color.
#[inline]
pub const fn unpack_color(color: u32) -> [u8; 4] {
    color.to_be_bytes()
}

/// Material tiers, rim to core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialTier {
    Iron,
    Titanium,
    Naonite,
    Trinium,
    Xanion,
    Ogonite,
    Avorion,
}

impl MaterialTier {
    pub const ALL: [MaterialTier; 7] = [
        MaterialTier::Iron,
        MaterialTier::Titanium,
        MaterialTier::Naonite,
        MaterialTier::Trinium,
        MaterialTier::Xanion,
        MaterialTier::Ogonite,
        MaterialTier::Avorion,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            MaterialTier::Iron => "Iron",
            MaterialTier::Titanium => "Titanium",
            MaterialTier::Naonite => "Naonite",
            MaterialTier::Trinium => "Trinium",
            MaterialTier::Xanion => "Xanion",
            MaterialTier::Ogonite => "Ogonite",
            MaterialTier::Avorion => "Avorion",
        }
    }

    /// Default hull color (opaque).
    pub const fn color(self) -> u32 {
        match self {
            MaterialTier::Iron => pack_color(184, 184, 192, 255),
            MaterialTier::Titanium => pack_color(208, 222, 242, 255),
            MaterialTier::Naonite => pack_color(38, 235, 89, 255),
            MaterialTier::Trinium => pack_color(64, 166, 255, 255),
            MaterialTier::Xanion => pack_color(255, 209, 38, 255),
            MaterialTier::Ogonite => pack_color(255, 102, 38, 255),
            MaterialTier::Avorion => pack_color(217, 51, 255, 255),
        }
    }

    /// Look up a tier by name. Unknown names resolve to Iron.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|tier| tier.name() == name)
            .unwrap_or(MaterialTier::Iron)
    }
}

/// Default color for a material name.
pub fn default_color(material: &str) -> u32 {
    MaterialTier::from_name(material).color()
}

/// Interns material names into compact ids.
#[derive(Clone, Debug, Default)]
pub struct MaterialPalette {
    ids: HashMap<String, MaterialId>,
    names: Vec<String>,
}

impl MaterialPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, assigning the next free id on first sight.
    ///
    /// Returns `None` once the 32-bit id space is exhausted.
    pub fn intern(&mut self, name: &str) -> Option<MaterialId> {
        if let Some(&id) = self.ids.get(name) {
            return Some(id);
        }
        let id = MaterialId(u32::try_from(self.names.len()).ok()?);
        self.ids.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        Some(id)
    }

    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_color() {
        let c = pack_color(1, 2, 3, 4);
        assert_eq!(c, 0x0102_0304);
        assert_eq!(unpack_color(c), [1, 2, 3, 4]);
    }

    #[test]
    fn catalogue_colors() {
        assert_eq!(default_color("Iron"), pack_color(184, 184, 192, 255));
        assert_eq!(default_color("Avorion"), pack_color(217, 51, 255, 255));
        assert_eq!(default_color("Unobtainium"), default_color("Iron"));
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(MaterialTier::Iron < MaterialTier::Avorion);
        for tier in MaterialTier::ALL {
            assert_eq!(MaterialTier::from_name(tier.name()), tier);
        }
    }

    #[test]
    fn palette_interns_in_first_seen_order() {
        let mut palette = MaterialPalette::new();
        assert!(palette.is_empty());

        let a = palette.intern("Titanium").unwrap();
        let b = palette.intern("Iron").unwrap();
        let again = palette.intern("Titanium").unwrap();

        assert_eq!(a, MaterialId(0));
        assert_eq!(b, MaterialId(1));
        assert_eq!(again, a);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.name(b), Some("Iron"));
        assert_eq!(palette.name(MaterialId(9)), None);
    }

    #[test]
    fn palette_holds_more_than_u16_materials() {
        let mut palette = MaterialPalette::new();
        let mut last = None;
        for i in 0..70_000 {
            last = palette.intern(&format!("alloy-{i}"));
        }

        assert_eq!(last, Some(MaterialId(69_999)));
        assert_eq!(palette.len(), 70_000);
        assert_eq!(palette.name(MaterialId(65_536)), Some("alloy-65536"));
    }
}
