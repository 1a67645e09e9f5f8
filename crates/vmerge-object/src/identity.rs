//! Object identities
//!
//! An [`ObjectIdentity`] names one logical object across all three packages.
//! Identities are keyed by their external uuid and never carry a package
//! reference; package membership lives in the per-role version records.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Arena index of an identity inside one registry
///
/// Stable for the lifetime of the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Position in the registry arena
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Stable object across Base, Customer and NewVendor packages
///
/// Created the first time a uuid is observed and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    /// Registry-issued id
    pub id: ObjectId,
    /// Globally unique external uuid
    pub external_uuid: String,
    /// Display name as first observed
    pub name: String,
    /// Object category
    pub object_type: ObjectType,
}

/// Object categories found in a package
///
/// Declaration order doubles as the review order for grouped changes:
/// data types come before the rules and interfaces that use them, and
/// process models come last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    /// Custom data type
    Cdt,
    /// Record type
    RecordType,
    /// Constant
    Constant,
    /// Expression rule
    ExpressionRule,
    /// Decision table
    Decision,
    /// Query rule
    QueryRule,
    /// Integration or connected system
    Integration,
    /// Web API
    WebApi,
    /// User interface
    Interface,
    /// Site or report
    Site,
    /// Group
    Group,
    /// Process model
    ProcessModel,
    /// Anything the extractor could not categorize
    Other(String),
}

impl ObjectType {
    /// Canonical label
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cdt => "CDT",
            Self::RecordType => "RecordType",
            Self::Constant => "Constant",
            Self::ExpressionRule => "ExpressionRule",
            Self::Decision => "Decision",
            Self::QueryRule => "QueryRule",
            Self::Integration => "Integration",
            Self::WebApi => "WebApi",
            Self::Interface => "Interface",
            Self::Site => "Site",
            Self::Group => "Group",
            Self::ProcessModel => "ProcessModel",
            Self::Other(label) => label,
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = std::convert::Infallible;

    /// Case-insensitive; separators are ignored and unknown labels map to
    /// [`ObjectType::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        Ok(match key.as_str() {
            "cdt" | "datatype" | "customdatatype" => Self::Cdt,
            "recordtype" => Self::RecordType,
            "constant" => Self::Constant,
            "expressionrule" | "rule" => Self::ExpressionRule,
            "decision" | "decisiontable" => Self::Decision,
            "queryrule" => Self::QueryRule,
            "integration" | "connectedsystem" => Self::Integration,
            "webapi" => Self::WebApi,
            "interface" => Self::Interface,
            "site" | "report" => Self::Site,
            "group" => Self::Group,
            "processmodel" => Self::ProcessModel,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

/// Which of the three packages a version belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PackageRole {
    /// Original vendor release (A)
    Base,
    /// Customer-customized package (B)
    Customer,
    /// New vendor release (C)
    NewVendor,
}

impl PackageRole {
    /// All roles in pipeline order
    pub const ALL: [PackageRole; 3] = [Self::Base, Self::Customer, Self::NewVendor];
}

impl Display for PackageRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Base => "base",
            Self::Customer => "customer",
            Self::NewVendor => "new-vendor",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_parse_is_lenient() {
        assert_eq!("Process Model".parse::<ObjectType>().unwrap(), ObjectType::ProcessModel);
        assert_eq!("expression_rule".parse::<ObjectType>().unwrap(), ObjectType::ExpressionRule);
        assert_eq!("CDT".parse::<ObjectType>().unwrap(), ObjectType::Cdt);
        assert_eq!(
            "Robotic Task".parse::<ObjectType>().unwrap(),
            ObjectType::Other("Robotic Task".to_string())
        );
    }

    #[test]
    fn object_type_review_order() {
        assert!(ObjectType::Cdt < ObjectType::Interface);
        assert!(ObjectType::Interface < ObjectType::ProcessModel);
        assert!(ObjectType::ProcessModel < ObjectType::Other("x".into()));
    }

    #[test]
    fn package_role_display() {
        assert_eq!(PackageRole::NewVendor.to_string(), "new-vendor");
        assert_eq!(PackageRole::ALL.len(), 3);
    }
}
