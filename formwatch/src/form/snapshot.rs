use serde::Serialize;

use super::field::FieldId;

/// Raw field values captured at submit time.
///
/// A plain value object; turning it into JSON or any other wire format
/// is up to the caller. Serializes with the binding's field keys
/// (`name`, `longName`, `description`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    /// Short name.
    pub name: String,
    /// Long name.
    pub long_name: String,
    /// Description.
    pub description: String,
}

impl FormSnapshot {
    /// Borrow the snapshot as the page's submit payload.
    pub fn submission(&self) -> Submission<'_> {
        Submission {
            info: SubmissionInfo {
                name: &self.name,
                long_name: &self.long_name,
                description: &self.description,
            },
        }
    }

    /// Get a field's value by id.
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => &self.name,
            FieldId::LongName => &self.long_name,
            FieldId::Description => &self.description,
        }
    }
}

/// Submit payload in the shape the page posts it:
/// `{"Info": {"Name": .., "LongName": .., "Discription": ..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Submission<'a> {
    #[serde(rename = "Info")]
    pub info: SubmissionInfo<'a>,
}

/// Body of a [`Submission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionInfo<'a> {
    pub name: &'a str,
    pub long_name: &'a str,
    // The page's payload spells it this way.
    #[serde(rename = "Discription")]
    pub description: &'a str,
}
