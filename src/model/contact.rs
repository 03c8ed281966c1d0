use serde::{Deserialize, Serialize};

use super::{present, validation::Violations};

/// A stored contact (address holder of an installation).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub zip_code: String,
    pub city: String,
    pub house_number: String,
}

/// Contact fields that passed validation, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub zip_code: String,
    pub city: String,
    pub house_number: String,
}

/// Request body of `POST`, `PUT` and `PATCH` on contacts.
///
/// Every field is optional so that missing fields surface as validation
/// problems instead of deserialization errors, and tri-state so that a `PATCH`
/// with an explicit `null` is told apart from an absent field. Unknown fields
/// (`id`, `_links`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub zip_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub house_number: Option<Option<String>>,
}

fn flat(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(Option::as_deref)
}

impl ContactPayload {
    /// Checks every field and reports all problems at once.
    pub fn validate(&self) -> Result<NewContact, Violations> {
        let mut violations = Violations::new();
        let name = violations.not_blank("name", flat(&self.name));
        let zip_code = violations.not_blank("zipCode", flat(&self.zip_code));
        let city = violations.not_blank("city", flat(&self.city));
        let house_number = violations.not_blank("houseNumber", flat(&self.house_number));

        match (name, zip_code, city, house_number) {
            (Some(name), Some(zip_code), Some(city), Some(house_number)) if violations.is_empty() => {
                Ok(NewContact { name, zip_code, city, house_number })
            }
            _ => Err(violations),
        }
    }

    /// Fills fields absent from a `PATCH` body with the stored values.
    /// An explicit `null` is kept and fails validation.
    pub fn merge_into(self, current: &Contact) -> ContactPayload {
        let keep = |value: &String| Some(Some(value.clone()));
        ContactPayload {
            name: self.name.or_else(|| keep(&current.name)),
            zip_code: self.zip_code.or_else(|| keep(&current.zip_code)),
            city: self.city.or_else(|| keep(&current.city)),
            house_number: self.house_number.or_else(|| keep(&current.house_number)),
        }
    }
}
