use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ValueInputOption {
    #[default]
    Raw,
    UserEntered,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MergeType {
    #[default]
    MergeAll,
    MergeColumns,
    MergeRows,
}

/// Drive permission role.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Role {
    Owner,
    Organizer,
    FileOrganizer,
    #[default]
    Writer,
    Commenter,
    Reader,
}

/// Drive permission grantee type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PermissionType {
    #[default]
    User,
    Group,
    Domain,
    Anyone,
}

/// One address or a list of addresses to share with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Recipients::One(recipient) => vec![recipient],
            Recipients::Many(recipients) => recipients,
        }
    }
}

impl From<&str> for Recipients {
    fn from(value: &str) -> Self {
        Recipients::One(value.to_owned())
    }
}

impl From<String> for Recipients {
    fn from(value: String) -> Self {
        Recipients::One(value)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(value: Vec<String>) -> Self {
        Recipients::Many(value)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(value: Vec<&str>) -> Self {
        Recipients::Many(value.into_iter().map(str::to_owned).collect())
    }
}

/// Body of a Drive `permissions.create` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
    #[serde(rename = "type")]
    pub perm_type: PermissionType,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip)]
    pub notify: bool,
}

impl PermissionRequest {
    pub fn new(value: &str, perm_type: PermissionType, role: Role) -> Self {
        let (email_address, domain) = match perm_type {
            PermissionType::User | PermissionType::Group => (Some(value.to_owned()), None),
            PermissionType::Domain => (None, Some(value.to_owned())),
            PermissionType::Anyone => (None, None),
        };
        PermissionRequest {
            perm_type,
            role,
            email_address,
            domain,
            notify: true,
        }
    }
}
