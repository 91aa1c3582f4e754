//! Fixed vocabularies and index-derived identity fields.
//!
//! Identity fields never come from an unmodulated random draw: they are a
//! function of the logical index alone, so the same index always yields the
//! same name regardless of seed.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::pick;

pub const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Dmitri", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas",
    "Keiko", "Liam", "Maya", "Nikolai", "Olivia", "Pablo", "Quinn", "Rosa", "Sven", "Tara",
];

pub const LAST_NAMES: &[&str] = &[
    "Anderson",
    "Becker",
    "Costa",
    "Dubois",
    "Eriksen",
    "Fischer",
    "Garcia",
    "Hansen",
    "Ivanova",
    "Jensen",
    "Kowalski",
    "Larsen",
    "Moreau",
    "Novak",
    "Okafor",
    "Petrov",
    "Quiroga",
    "Rossi",
    "Schmidt",
    "Tanaka",
];

pub const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

pub const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Sales",
    "Marketing",
    "Finance",
    "Support",
    "Operations",
    "Legal",
    "Research",
    "Logistics",
    "Procurement",
    "Design",
];

pub const CATEGORIES: &[&str] = &[
    "Electronics",
    "Books",
    "Garden",
    "Kitchen",
    "Toys",
    "Sports",
    "Outdoors",
    "Office",
    "Beauty",
    "Automotive",
    "Music",
    "Health",
    "Pets",
];

pub const ADJECTIVES: &[&str] = &[
    "Compact",
    "Durable",
    "Elegant",
    "Ergonomic",
    "Lightweight",
    "Modern",
    "Portable",
    "Premium",
    "Rugged",
    "Sleek",
    "Smart",
    "Classic",
    "Wireless",
    "Vintage",
    "Solar",
    "Foldable",
    "Refined",
];

pub const NOUNS: &[&str] = &[
    "Lamp",
    "Chair",
    "Backpack",
    "Speaker",
    "Kettle",
    "Monitor",
    "Notebook",
    "Bottle",
    "Jacket",
    "Drone",
    "Keyboard",
    "Blender",
    "Tent",
    "Watch",
    "Router",
    "Camera",
    "Desk",
    "Headset",
    "Mug",
];

pub const BRANDS: &[&str] = &[
    "Acme",
    "Northwind",
    "Contoso",
    "Globex",
    "Initech",
    "Umbrella",
    "Stark",
    "Wayne",
    "Hooli",
    "Vandelay",
    "Soylent",
    "Tyrell",
    "Cyberdyne",
];

const AUDIENCES: &[&str] = &[
    "everyday use",
    "professionals",
    "small teams",
    "travel",
    "the whole family",
    "beginners",
    "power users",
    "outdoor enthusiasts",
];

const QUALITIES: &[&str] = &[
    "built to last",
    "easy to maintain",
    "backed by a two-year warranty",
    "made from recycled materials",
    "tested under heavy load",
    "designed for comfort",
];

/// `"<First> <Last>"`, cycling through every combination of the two pools.
pub fn person_name(index: u64) -> String {
    let first = pick(FIRST_NAMES, index, 1);
    let last = pick(LAST_NAMES, index / FIRST_NAMES.len() as u64, 7);
    format!("{first} {last}")
}

/// Unique per index: the 1-based index is part of the local part.
pub fn email(index: u64) -> String {
    let first = pick(FIRST_NAMES, index, 1).to_ascii_lowercase();
    let last = pick(LAST_NAMES, index / FIRST_NAMES.len() as u64, 7).to_ascii_lowercase();
    let domain = pick(EMAIL_DOMAINS, index, 3);
    format!("{first}.{last}{}@{domain}", index + 1)
}

/// Pool entry, suffixed with the round number once the pool wraps.
fn pooled_name(pool: &[&str], index: u64) -> String {
    let base = pick(pool, index, 1);
    let round = index / pool.len().max(1) as u64;
    if round == 0 {
        base.to_string()
    } else {
        format!("{base} {}", round + 1)
    }
}

pub fn department_name(index: u64) -> String {
    pooled_name(DEPARTMENTS, index)
}

pub fn category_name(index: u64) -> String {
    pooled_name(CATEGORIES, index)
}

/// `"<Brand> <Adjective> <Noun>"`.
pub fn product_name(index: u64) -> String {
    let brand = pick(BRANDS, index, 5);
    let adjective = pick(ADJECTIVES, index, 3);
    let noun = pick(NOUNS, index, 1);
    format!("{brand} {adjective} {noun}")
}

/// Free-text description about `subject`, drawn from the value stream.
pub fn description<R: Rng>(rng: &mut R, subject: &str) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Useful");
    let audience = AUDIENCES.choose(rng).copied().unwrap_or("everyone");
    let quality = QUALITIES.choose(rng).copied().unwrap_or("reliable");
    format!("{adjective} {subject} for {audience}, {quality}.")
}
