use serde::Deserialize;
use time::OffsetDateTime;

use crate::deser::{option_license_name, option_non_empty_str};

/// A repository on github.
#[derive(Clone, Debug, Deserialize)]
pub struct GithubRepo {
    pub owner: Option<GithubUser>,
    pub id: u64,
    pub name: Box<str>,
    #[serde(default, with = "option_non_empty_str")]
    pub description: Option<Box<str>>,
    #[serde(rename = "fork")]
    pub is_forked: bool,
    #[serde(rename = "html_url")]
    pub url: Box<str>,
    #[serde(rename = "archived")]
    pub is_archived: bool,
    #[serde(rename = "forks_count")]
    pub forks: u32,
    #[serde(rename = "open_issues_count")]
    pub open_issues: u32,
    // We only need the license name
    #[serde(default, with = "option_license_name")]
    pub license: Option<Box<str>>,
    pub size: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "pushed_at", default, with = "time::serde::rfc3339::option")]
    pub last_push: Option<OffsetDateTime>,
    #[serde(rename = "homepage", default, with = "option_non_empty_str")]
    pub page: Option<Box<str>>,
    #[serde(rename = "stargazers_count")]
    pub stars: u32,
    pub language: Option<Box<str>>,
}

/// A user on github.
///
/// Users nested inside of other payloads, e.g. as repository owner, only
/// carry a subset of the fields so most of them are optional.
#[derive(Clone, Debug, Deserialize)]
pub struct GithubUser {
    pub login: Box<str>,
    pub name: Option<Box<str>>,
    pub id: u64,
    pub avatar_url: Option<Box<str>>,
    #[serde(rename = "html_url")]
    pub url: Box<str>,
    #[serde(rename = "type")]
    pub kind: Box<str>,
    pub email: Option<Box<str>>,
    pub location: Option<Box<str>>,
    pub public_repos: Option<u32>,
    #[serde(default, with = "option_non_empty_str")]
    pub bio: Option<Box<str>>,
    pub followers: Option<u32>,
    pub following: Option<u32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub repos_url: Box<str>,
}

impl GithubUser {
    /// The display name if available, the login otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// Response of github's repository search endpoint.
#[derive(Debug, Deserialize)]
pub struct GithubRepoSearch {
    #[serde(default)]
    pub total_count: u32,
    pub items: Vec<GithubRepo>,
}
