//! Identifier synthesis.
//!
//! Raw numeric keys are not valid XML IDs and collide across tables, so every
//! exported key is tagged with its kind's prefix letter. Award rows have no
//! key of their own and are identified by year plus linked person.

use crate::EntityKind;

/// Person component of an award ID when no person is linked.
pub const AWARD_PLACEHOLDER: &str = "0000000";

/// Synthesize the identifier for a record of `kind`.
///
/// For movies and persons `raw_id` is appended to the prefix as given. For
/// awards the result is `O<year><raw_id>`, with [`AWARD_PLACEHOLDER`]
/// standing in for an empty `raw_id`; `year` is ignored for other kinds.
pub fn make_id(kind: EntityKind, raw_id: &str, year: Option<&str>) -> String {
    match kind {
        EntityKind::Movie | EntityKind::Person => {
            let mut id = String::with_capacity(raw_id.len() + 1);
            id.push(kind.id_prefix());
            id.push_str(raw_id);
            id
        }
        EntityKind::Award => award_id(year.unwrap_or_default(), raw_id),
    }
}

/// `M<raw_id>`
#[inline]
pub fn movie_id(raw_id: &str) -> String {
    make_id(EntityKind::Movie, raw_id, None)
}

/// `P<raw_id>`
#[inline]
pub fn person_id(raw_id: &str) -> String {
    make_id(EntityKind::Person, raw_id, None)
}

/// `O<year><person_id>`, or `O<year>0000000` when no person is linked.
pub fn award_id(year: &str, person_id: &str) -> String {
    let person = if person_id.is_empty() {
        AWARD_PLACEHOLDER
    } else {
        person_id
    };

    let mut id = String::with_capacity(1 + year.len() + person.len());
    id.push(EntityKind::Award.id_prefix());
    id.push_str(year);
    id.push_str(person);
    id
}
