use serde::{Deserialize, Serialize};

use super::{present, validation::Violations};

pub const OUTPUT_POWER_MIN: (f64, &str) = (0.0001, "0.0001");
pub const OUTPUT_POWER_MAX: (f64, &str) = (999_999.0, "999999");

/// A stored production installation. The linked contact is exposed as a link,
/// never inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionInstallation {
    pub id: i64,
    pub name: String,
    pub output_power: f64,
    #[serde(skip)]
    pub contact_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInstallation {
    pub name: String,
    pub output_power: f64,
}

/// Request body of `POST`, `PUT` and `PATCH` on production installations.
///
/// Every field is tri-state: absent (`None`), explicit `null` (`Some(None)`)
/// or a value. For `contact` absent leaves the link alone, `null` unlinks and
/// a value is a contact URI such as `http://host/api/contacts/3`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationPayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub output_power: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub contact: Option<Option<String>>,
}

impl InstallationPayload {
    pub fn validate(&self) -> Result<NewInstallation, Violations> {
        let mut violations = Violations::new();
        let name = violations.not_blank("name", self.name.as_ref().and_then(Option::as_deref));
        let output_power =
            violations.decimal_range("outputPower", self.output_power.flatten(), OUTPUT_POWER_MIN, OUTPUT_POWER_MAX);

        match (name, output_power) {
            (Some(name), Some(output_power)) if violations.is_empty() => {
                Ok(NewInstallation { name, output_power })
            }
            _ => Err(violations),
        }
    }

    /// Fills scalar fields absent from a `PATCH` body with the stored values;
    /// an explicit `null` stays and fails validation. The contact link keeps
    /// its tri-state meaning.
    pub fn merge_into(self, current: &ProductionInstallation) -> InstallationPayload {
        InstallationPayload {
            name: self.name.or_else(|| Some(Some(current.name.clone()))),
            output_power: self.output_power.or(Some(Some(current.output_power))),
            contact: self.contact,
        }
    }
}
