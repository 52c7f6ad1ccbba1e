//! # NPC Names
//!
//! Fixed vocabularies for NPC display names.

use crate::game::{NpcKind, NpcTitle};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Adjective placed before an NPC's title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Descriptor {
    Fierce,
    Mighty,
    Swift,
    Cunning,
    Ancient,
    Dark,
    Wild,
}

impl Descriptor {
    pub const ALL: [Descriptor; 7] = [
        Descriptor::Fierce,
        Descriptor::Mighty,
        Descriptor::Swift,
        Descriptor::Cunning,
        Descriptor::Ancient,
        Descriptor::Dark,
        Descriptor::Wild,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Descriptor::Fierce => "Fierce",
            Descriptor::Mighty => "Mighty",
            Descriptor::Swift => "Swift",
            Descriptor::Cunning => "Cunning",
            Descriptor::Ancient => "Ancient",
            Descriptor::Dark => "Dark",
            Descriptor::Wild => "Wild",
        }
    }
}

/// Picks a random descriptor.
pub fn random_descriptor<R: Rng + ?Sized>(rng: &mut R) -> Descriptor {
    *Descriptor::ALL.choose(rng).unwrap_or(&Descriptor::Wild)
}

/// Picks a random title.
pub fn random_title<R: Rng + ?Sized>(rng: &mut R) -> NpcTitle {
    *NpcTitle::ALL.choose(rng).unwrap_or(&NpcTitle::Guard)
}

/// Composes a display name such as `"Level 3 Swift Rogue"` or `"Boss 2 Dark Knight"`.
///
/// # Examples
///
/// ```
/// use gridcrawl::{display_name, Descriptor, NpcKind, NpcTitle};
///
/// let name = display_name(NpcKind::Boss, 2, Descriptor::Dark, NpcTitle::Knight);
/// assert_eq!(name, "Boss 2 Dark Knight");
/// ```
pub fn display_name(kind: NpcKind, level: u32, descriptor: Descriptor, title: NpcTitle) -> String {
    format!(
        "{} {} {} {}",
        kind.name_prefix(),
        level,
        descriptor.name(),
        title.name()
    )
}
