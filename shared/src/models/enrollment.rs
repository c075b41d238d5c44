//! Enrollment Model (device-side fingerprint identity)

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier of a fingerprint template stored on the sensor.
///
/// The sensor firmware reports small integers, but nothing in the server
/// interprets the value: it is compared and stored as text only. JSON
/// numbers and strings are both accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(transparent))]
pub struct EnrollmentId(String);

impl EnrollmentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EnrollmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EnrollmentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u32> for EnrollmentId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for EnrollmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(Self(n.to_string())),
            Raw::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(serde::de::Error::custom("enrollment id must not be empty"));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    }
}

/// Device enrollment joined with the employee that references it (if any)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentEntry {
    pub enrollment_id: EnrollmentId,
    pub employee_id: Option<i64>,
    pub employee_code: Option<String>,
    pub employee_name: Option<String>,
}

/// Register an employee for an enrollment captured earlier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRegister {
    pub enrollment_id: EnrollmentId,
    #[serde(flatten)]
    pub employee: super::EmployeeCreate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_number_and_string() {
        let a: EnrollmentId = serde_json::from_str("7").unwrap();
        let b: EnrollmentId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "7");
    }

    #[test]
    fn test_rejects_blank_string() {
        assert!(serde_json::from_str::<EnrollmentId>("\"  \"").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let id = EnrollmentId::from(12u32);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"12\"");
    }
}
