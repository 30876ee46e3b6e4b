use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

/// One slot of an aligned axis.
///
/// Serializes as an ISO-8601 local timestamp for calendar buckets and as a bare
/// number for index buckets, which is what time and category scales expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Instant(NaiveDateTime),
    Index(u32),
}

impl Label {
    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self {
            Label::Instant(dt) => Some(*dt),
            Label::Index(_) => None,
        }
    }

    pub fn index(&self) -> Option<u32> {
        match self {
            Label::Index(i) => Some(*i),
            Label::Instant(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Instant(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Label::Index(i) => write!(f, "{i}"),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Label::Instant(_) => serializer.collect_str(self),
            Label::Index(i) => serializer.serialize_u32(*i),
        }
    }
}
