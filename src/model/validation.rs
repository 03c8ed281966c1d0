//! Field validation rules shared by both resources.
//!
//! Messages match the wording clients of the original API expect
//! (`must not be blank`, `must be greater than or equal to 0.0001`, ...).

use std::fmt;

pub const MUST_NOT_BE_BLANK: &str = "must not be blank";
pub const MUST_NOT_BE_NULL: &str = "must not be null";

/// One invalid property of a submitted resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub property: String,
    pub message: String,
}

impl Violation {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self { property: property.into(), message: message.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property \"{}\": {}.", self.property, self.message)
    }
}

/// All violations found for one resource, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Requires a present string with at least one non-whitespace character.
    pub fn not_blank(&mut self, property: &str, value: Option<&str>) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v.to_string()),
            _ => {
                self.push(Violation::new(property, MUST_NOT_BE_BLANK));
                None
            }
        }
    }

    /// Requires a present number inside the inclusive decimal range `[min, max]`.
    ///
    /// `min_text`/`max_text` are the bounds as written in messages.
    pub fn decimal_range(
        &mut self,
        property: &str,
        value: Option<f64>,
        (min, min_text): (f64, &str),
        (max, max_text): (f64, &str),
    ) -> Option<f64> {
        let Some(v) = value else {
            self.push(Violation::new(property, MUST_NOT_BE_NULL));
            return None;
        };
        if !v.is_finite() {
            self.push(Violation::new(property, "must be a finite number"));
            None
        } else if v < min {
            self.push(Violation::new(property, format!("must be greater than or equal to {}", min_text)));
            None
        } else if v > max {
            self.push(Violation::new(property, format!("must be less than or equal to {}", max_text)));
            None
        } else {
            Some(v)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
