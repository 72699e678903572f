//! Entity and relation kinds.
//!
//! The source database holds three primary tables (`Movie`, `Person`, `Oscar`)
//! and two pivot tables (`Director`, `Actor`). Every name used to query those
//! tables or to build XML elements is derived from the enums here, so no
//! identifier ever reaches SQL text from outside this module.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A primary record kind, exported as its own XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// A row of the `Movie` table.
    Movie,
    /// A row of the `Person` table.
    Person,
    /// A row of the `Oscar` table.
    Award,
}

impl EntityKind {
    /// All kinds, in export order.
    pub const ALL: [EntityKind; 3] = [Self::Movie, Self::Award, Self::Person];

    /// Name of the source table.
    pub const fn table_name(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Person => "Person",
            Self::Award => "Oscar",
        }
    }

    /// Name of the XML element written for each record.
    pub const fn element_name(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Person => "person",
            Self::Award => "oscar",
        }
    }

    /// Name of the document root element.
    pub const fn root_name(&self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Person => "people",
            Self::Award => "oscars",
        }
    }

    /// Name of the output file, `<root>.xml`.
    pub fn file_name(&self) -> String {
        format!("{}.xml", self.root_name())
    }

    /// Single-letter prefix of synthesized identifiers.
    pub const fn id_prefix(&self) -> char {
        match self {
            Self::Movie => 'M',
            Self::Person => 'P',
            Self::Award => 'O',
        }
    }

    /// Relations exported as attributes on this kind's elements.
    pub const fn relations(&self) -> &'static [Relation] {
        match self {
            Self::Movie | Self::Person => &[Relation::Director, Relation::Actor, Relation::Award],
            Self::Award => &[],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| {
                s.eq_ignore_ascii_case(kind.table_name()) || s.eq_ignore_ascii_case(kind.element_name())
            })
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// A link between a person and a movie.
///
/// `Director` and `Actor` are pure pivot tables; `Award` rows carry their own
/// movie and (optional) person references and double as a pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Director,
    Actor,
    Award,
}

impl Relation {
    /// Name of the table holding the links.
    pub const fn table_name(&self) -> &'static str {
        match self {
            Self::Director => "Director",
            Self::Actor => "Actor",
            Self::Award => EntityKind::Award.table_name(),
        }
    }

    /// Column holding the person side of the link.
    pub const fn person_column(&self) -> &'static str {
        match self {
            Self::Director => "director_id",
            Self::Actor => "actor_id",
            Self::Award => "person_id",
        }
    }

    /// Column holding the movie side of the link.
    pub const fn movie_column(&self) -> &'static str {
        "movie_id"
    }

    /// Attribute name used on an element of `anchor` kind.
    ///
    /// Returns `None` for anchors that carry no relation attributes.
    pub const fn attribute_name(&self, anchor: EntityKind) -> Option<&'static str> {
        match (anchor, self) {
            (EntityKind::Person, Self::Director) => Some("directed"),
            (EntityKind::Person, Self::Actor) => Some("actedIn"),
            (EntityKind::Movie, Self::Director) => Some("directors"),
            (EntityKind::Movie, Self::Actor) => Some("actors"),
            (EntityKind::Movie | EntityKind::Person, Self::Award) => Some("oscars"),
            (EntityKind::Award, _) => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
