//! Named profiles from the shared credentials and config files.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::Profile;

const CREDENTIALS_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";
const CONFIG_ENV: &str = "AWS_CONFIG_FILE";

/// Where profiles are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileSources {
    pub credentials: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl ProfileSources {
    /// `~/.aws/credentials` and `~/.aws/config`, unless overridden by the
    /// usual environment variables.
    pub fn from_env() -> Self {
        let aws_dir = dirs::home_dir().map(|home| home.join(".aws"));
        let pick = |var: &str, file: &str| {
            std::env::var_os(var)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|dir| dir.join(file)))
        };
        Self {
            credentials: pick(CREDENTIALS_ENV, "credentials"),
            config: pick(CONFIG_ENV, "config"),
        }
    }

    pub fn new(credentials: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Self {
        Self {
            credentials: Some(credentials.into()),
            config: Some(config.into()),
        }
    }
}

type Sections = Vec<(String, BTreeMap<String, String>)>;

/// Minimal INI reader: `[section]` headers, `key = value` pairs, `#` and `;`
/// comment lines. Lines before the first header are ignored.
fn parse_ini(content: &str) -> Sections {
    let mut sections: Sections = Vec::new();
    let mut current: Option<usize> = None;
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            // A repeated header continues the earlier section.
            current = match sections.iter().position(|(n, _)| *n == name) {
                Some(at) => Some(at),
                None => {
                    sections.push((name, BTreeMap::new()));
                    Some(sections.len() - 1)
                }
            };
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if let Some((_, values)) = current.and_then(|at| sections.get_mut(at)) {
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    sections
}

fn read_optional(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
    }
}

/// Maps a config-file section name to a profile name. Sections that are not
/// profiles (`sso-session x`, `services x`) yield `None`.
fn config_profile_name(section: &str) -> Option<&str> {
    if section == "default" {
        return Some("default");
    }
    section
        .strip_prefix("profile ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Merge both files into one list in first-seen order.
///
/// Credentials are read first; a region from the config file wins over one
/// from the credentials file. A missing file counts as empty.
pub fn enumerate_profiles(sources: &ProfileSources) -> Result<Vec<Profile>> {
    let mut profiles: Vec<Profile> = Vec::new();

    if let Some(content) = read_optional(sources.credentials.as_deref())? {
        for (section, values) in parse_ini(&content) {
            upsert(&mut profiles, &section, values.get("region").cloned());
        }
    }

    if let Some(content) = read_optional(sources.config.as_deref())? {
        for (section, values) in parse_ini(&content) {
            let Some(name) = config_profile_name(&section) else {
                tracing::debug!(section = %section, "skipping non-profile config section");
                continue;
            };
            upsert(&mut profiles, name, values.get("region").cloned());
        }
    }

    tracing::debug!(count = profiles.len(), "enumerated profiles");
    Ok(profiles)
}

fn upsert(profiles: &mut Vec<Profile>, name: &str, region: Option<String>) {
    match profiles.iter_mut().find(|p| p.name == name) {
        Some(existing) => {
            if region.is_some() {
                existing.region = region;
            }
        }
        None => profiles.push(Profile::new(name, region)),
    }
}

#[cfg(test)]
#[path = "tests/profiles_tests.rs"]
mod tests;
