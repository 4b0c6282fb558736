//! Annotation labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SheetLabelError;

/// The classification attached to a cell or a region of a sheet.
///
/// Every label has a canonical name (`MetaTitle`) and a lower-case
/// alternative name (`metatitle`). Parsing accepts either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Attributes,
    Data,
    Header,
    Metadata,
    Derived,
    Table,
    MetaTitle,
    Notes,
    GroupHead,
    Other,
    Mixed,
}

impl Label {
    /// All labels in declaration order.
    pub const ALL: [Label; 11] = [
        Label::Attributes,
        Label::Data,
        Label::Header,
        Label::Metadata,
        Label::Derived,
        Label::Table,
        Label::MetaTitle,
        Label::Notes,
        Label::GroupHead,
        Label::Other,
        Label::Mixed,
    ];

    /// The canonical name, as written in the interchange files.
    pub fn name(&self) -> &'static str {
        match self {
            Label::Attributes => "Attributes",
            Label::Data => "Data",
            Label::Header => "Header",
            Label::Metadata => "Metadata",
            Label::Derived => "Derived",
            Label::Table => "Table",
            Label::MetaTitle => "MetaTitle",
            Label::Notes => "Notes",
            Label::GroupHead => "GroupHead",
            Label::Other => "Other",
            Label::Mixed => "Mixed",
        }
    }

    /// The lower-case alternative name.
    pub fn alt_name(&self) -> &'static str {
        match self {
            Label::Attributes => "attributes",
            Label::Data => "data",
            Label::Header => "header",
            Label::Metadata => "metadata",
            Label::Derived => "derived",
            Label::Table => "table",
            Label::MetaTitle => "metatitle",
            Label::Notes => "notes",
            Label::GroupHead => "grouphead",
            Label::Other => "other",
            Label::Mixed => "mixed",
        }
    }

    /// Looks a label up by its alternative name only.
    pub fn from_alt_name(name: &str) -> Option<Label> {
        Label::ALL.into_iter().find(|l| l.alt_name() == name)
    }
}

impl FromStr for Label {
    type Err = SheetLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Label::ALL
            .into_iter()
            .find(|l| l.name() == s || l.alt_name() == s)
            .ok_or_else(|| SheetLabelError::UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
