//! Example astronauts for `POST /astronauts/example`.

use crate::astronaut::AstronautFields;

static EXAMPLES: [(&str, &str, &str, &str); 11] = [
    ("Yuri",      "Gagarin",    "1934-03-09", "Immortality"),
    ("Valentina", "Tereshkova", "1937-03-06", "Invisibility"),
    ("Neil",      "Armstrong",  "1930-08-05", "Super Jump"),
    ("Buzz",      "Aldrin",     "1930-01-20", "Super Speed"),
    ("Vladimír",  "Remek",      "1948-09-26", "Healing"),
    ("Sally",     "Ride",       "1951-05-26", "Super Speed"),
    ("Mae",       "Jemison",    "1956-10-17", "Healing"),
    ("Chris",     "Hadfield",   "1959-08-29", "Super Jump"),
    ("Peggy",     "Whitson",    "1960-02-09", "Immortality"),
    ("Ivan",      "Bella",      "1964-05-21", "Invisibility"),
    ("John",      "Glenn",      "1921-07-18", "Immortality"),
];

/// The example roster, in insertion order.
pub fn examples() -> impl Iterator<Item = AstronautFields> {
    EXAMPLES.iter().map(|&(first, last, birthdate, power)| {
        AstronautFields::new(first, last, birthdate, power)
    })
}
