//! Typed setting values.
//!
//! Every setting has a [`ValueKind`]. A kind parses raw strings (from flags,
//! environment variables, stored profile values or command arguments) into a
//! [`TypedValue`], and every typed value renders back to a canonical string
//! that parses to the same value.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_yaml::Value as YamlValue;
use uuid::Uuid;

use crate::error::ParseError;

/// The closed set of value kinds a setting can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    String,
    StringList,
    Uuid,
    Region,
    OutputFormat,
    Services,
}

impl ValueKind {
    pub const ALL: [ValueKind; 7] = [
        ValueKind::Bool,
        ValueKind::String,
        ValueKind::StringList,
        ValueKind::Uuid,
        ValueKind::Region,
        ValueKind::OutputFormat,
        ValueKind::Services,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::String => "string",
            Self::StringList => "string list",
            Self::Uuid => "UUID",
            Self::Region => "PingOne region",
            Self::OutputFormat => "output format",
            Self::Services => "service list",
        }
    }

    /// Parse a raw string into a value of this kind.
    pub fn parse(self, raw: &str) -> Result<TypedValue, ParseError> {
        match self {
            Self::Bool => parse_bool(raw).map(TypedValue::Bool),
            Self::String => Ok(TypedValue::String(raw.to_string())),
            Self::StringList => Ok(TypedValue::StringList(
                split_list(raw).map(str::to_string).collect(),
            )),
            Self::Uuid => parse_uuid(raw).map(TypedValue::Uuid),
            Self::Region => {
                let code = raw.trim();
                if code.is_empty() {
                    return Ok(TypedValue::Region(None));
                }
                PingOneRegion::from_code(code)
                    .map(|region| TypedValue::Region(Some(region)))
                    .ok_or_else(|| ParseError::UnrecognizedValue {
                        value: raw.to_string(),
                        allowed: PingOneRegion::allowed(),
                    })
            }
            Self::OutputFormat => {
                let name = raw.trim();
                if name.is_empty() {
                    return Ok(TypedValue::OutputFormat(None));
                }
                OutputFormat::from_name(name)
                    .map(|format| TypedValue::OutputFormat(Some(format)))
                    .ok_or_else(|| ParseError::UnrecognizedValue {
                        value: raw.to_string(),
                        allowed: OutputFormat::allowed(),
                    })
            }
            Self::Services => split_list(raw)
                .map(|token| {
                    Service::from_name(token).ok_or_else(|| ParseError::UnrecognizedValue {
                        value: token.to_string(),
                        allowed: Service::allowed(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(TypedValue::Services),
        }
    }

    /// The value `config unset` writes: `false`, an empty string or list, or
    /// the empty enum sentinel.
    pub fn zero(self) -> TypedValue {
        match self {
            Self::Bool => TypedValue::Bool(false),
            Self::String => TypedValue::String(String::new()),
            Self::StringList => TypedValue::StringList(Vec::new()),
            Self::Uuid => TypedValue::Uuid(None),
            Self::Region => TypedValue::Region(None),
            Self::OutputFormat => TypedValue::OutputFormat(None),
            Self::Services => TypedValue::Services(Vec::new()),
        }
    }

    /// Whether `raw` would parse as this kind.
    pub fn is_valid(self, raw: &str) -> bool {
        self.parse(raw).is_ok()
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Bool(bool),
    String(String),
    StringList(Vec<String>),
    /// `None` is the unset identifier.
    Uuid(Option<Uuid>),
    Region(Option<PingOneRegion>),
    OutputFormat(Option<OutputFormat>),
    /// Kept in the order given; duplicates are not removed.
    Services(Vec<Service>),
}

impl TypedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::StringList(_) => ValueKind::StringList,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Region(_) => ValueKind::Region,
            Self::OutputFormat(_) => ValueKind::OutputFormat,
            Self::Services(_) => ValueKind::Services,
        }
    }

    /// Canonical string form. `self.kind().parse(&self.render())` yields `self`.
    pub fn render(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::String(value) => value.clone(),
            Self::StringList(values) => values.join(","),
            Self::Uuid(id) => id.map(|id| id.hyphenated().to_string()).unwrap_or_default(),
            Self::Region(region) => region.map(|r| r.code().to_string()).unwrap_or_default(),
            Self::OutputFormat(format) => {
                format.map(|f| f.as_str().to_string()).unwrap_or_default()
            }
            Self::Services(services) => services
                .iter()
                .map(Service::as_str)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// The form written into the persisted store: booleans and sequences keep
    /// their YAML type, everything else is stored as its rendered string.
    pub fn to_persisted(&self) -> YamlValue {
        match self {
            Self::Bool(value) => YamlValue::Bool(*value),
            Self::StringList(values) => YamlValue::Sequence(
                values.iter().cloned().map(YamlValue::String).collect(),
            ),
            Self::Services(services) => YamlValue::Sequence(
                services
                    .iter()
                    .map(|s| YamlValue::String(s.as_str().to_string()))
                    .collect(),
            ),
            other => YamlValue::String(other.render()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(id) => *id,
            _ => None,
        }
    }

    pub fn as_region(&self) -> Option<PingOneRegion> {
        match self {
            Self::Region(region) => *region,
            _ => None,
        }
    }

    pub fn as_output_format(&self) -> Option<OutputFormat> {
        match self {
            Self::OutputFormat(format) => *format,
            _ => None,
        }
    }

    pub fn as_services(&self) -> Option<&[Service]> {
        match self {
            Self::Services(services) => Some(services),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::StringList(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Self::Services(services) => {
                let mut seq = serializer.serialize_seq(Some(services.len()))?;
                for service in services {
                    seq.serialize_element(service.as_str())?;
                }
                seq.end()
            }
            other => serializer.serialize_str(&other.render()),
        }
    }
}

/// PingOne deployment regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PingOneRegion {
    AsiaPacific,
    Canada,
    Europe,
    NorthAmerica,
}

impl PingOneRegion {
    pub const ALL: [PingOneRegion; 4] = [
        PingOneRegion::AsiaPacific,
        PingOneRegion::Canada,
        PingOneRegion::Europe,
        PingOneRegion::NorthAmerica,
    ];

    /// The short code users type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AsiaPacific => "AP",
            Self::Canada => "CA",
            Self::Europe => "EU",
            Self::NorthAmerica => "NA",
        }
    }

    /// The identifier the platform SDKs expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AsiaPacific => "AsiaPacific",
            Self::Canada => "Canada",
            Self::Europe => "Europe",
            Self::NorthAmerica => "NorthAmerica",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(code))
    }

    fn allowed() -> String {
        Self::ALL.map(|r| r.code()).join(", ")
    }
}

impl fmt::Display for PingOneRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Text, OutputFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(name))
    }

    fn allowed() -> String {
        Self::ALL.map(|f| f.as_str()).join(", ")
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Services that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    PingFederate,
    PingOneMfa,
    PingOnePlatform,
    PingOneSso,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::PingFederate,
        Service::PingOneMfa,
        Service::PingOnePlatform,
        Service::PingOneSso,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PingFederate => "pingfederate",
            Self::PingOneMfa => "pingone-mfa",
            Self::PingOnePlatform => "pingone-platform",
            Self::PingOneSso => "pingone-sso",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(name))
    }

    fn allowed() -> String {
        Self::ALL.map(|s| s.as_str()).join(", ")
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::InvalidValue {
            value: raw.to_string(),
            expected: "boolean (true or false)",
        })
    }
}

fn parse_uuid(raw: &str) -> Result<Option<Uuid>, ParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    // Only the hyphenated 8-4-4-4-12 form is 36 characters long.
    if value.len() != 36 {
        return Err(invalid_uuid(raw));
    }
    Uuid::parse_str(value).map(Some).map_err(|_| invalid_uuid(raw))
}

fn invalid_uuid(raw: &str) -> ParseError {
    ParseError::InvalidFormat {
        value: raw.to_string(),
        expected: "UUID (xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx)",
    }
}

/// Comma-separated tokens, trimmed, empties dropped.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|token| !token.is_empty())
}
