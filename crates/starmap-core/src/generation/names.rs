//! Star name generation

use rand::Rng;
use std::collections::HashSet;

/// Generate a star name not already in `taken`
pub fn generate_star_name(rng: &mut impl Rng, taken: &HashSet<String>) -> String {
    for _ in 0..16 {
        let root = STAR_ROOTS[rng.gen_range(0..STAR_ROOTS.len())];
        let suffix = STAR_SUFFIXES[rng.gen_range(0..STAR_SUFFIXES.len())];
        let name = format!("{} {}", root, suffix);
        if !taken.contains(&name) {
            return name;
        }
    }
    // Name space exhausted for this root; number it
    let root = STAR_ROOTS[rng.gen_range(0..STAR_ROOTS.len())];
    let mut index = taken.len() + 1;
    loop {
        let name = format!("{}-{}", root, index);
        if !taken.contains(&name) {
            return name;
        }
        index += 1;
    }
}

static STAR_ROOTS: &[&str] = &[
    "Vega",
    "Sirius",
    "Altair",
    "Deneb",
    "Rigel",
    "Orion",
    "Lyra",
    "Cygnus",
    "Antares",
    "Arcturus",
    "Castor",
    "Pollux",
    "Procyon",
    "Mira",
    "Hadar",
    "Achernar",
    "Canopus",
    "Fomalhaut",
    "Aldebaran",
    "Bellatrix",
    "Electra",
    "Maia",
    "Tau Ceti",
    "Kepler",
];

static STAR_SUFFIXES: &[&str] = &[
    "Prime", "Minor", "Major", "Reach", "Drift", "Gate", "Expanse", "Verge", "Alpha", "Beta",
    "Gamma", "Delta", "II", "III", "IV", "VII",
];
