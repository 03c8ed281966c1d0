//! Resource types, request payloads and their validation rules.

use serde::{Deserialize, Deserializer};

pub mod contact;
pub mod production_installation;
pub mod validation;

pub use contact::{Contact, ContactPayload, NewContact};
pub use production_installation::{InstallationPayload, NewInstallation, ProductionInstallation};
pub use validation::{Violation, Violations};

/// Tells an explicit `null` (`Some(None)`) apart from an absent field (`None`).
/// Used with `#[serde(default, deserialize_with = "present")]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
