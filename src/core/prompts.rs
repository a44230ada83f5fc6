// prompt library - moods, reflection prompts and {{placeholder}} templates

use crate::Error;
use std::path::Path;
use tracing::{debug, info};

const PROMPTS_FILE: &str = "prompts.json";
const SYSTEM_FILE: &str = "system_prompt.txt";
const CLASSIFICATION_FILE: &str = "classification_prompt.txt";
const USER_FILE: &str = "user_prompt.txt";

// shipped copies, used for anything missing on disk
const BUILTIN_PROMPTS: &str = include_str!("../../prompts/prompts.json");
const BUILTIN_SYSTEM: &str = include_str!("../../prompts/system_prompt.txt");
const BUILTIN_CLASSIFICATION: &str = include_str!("../../prompts/classification_prompt.txt");
const BUILTIN_USER: &str = include_str!("../../prompts/user_prompt.txt");

#[derive(Debug, Clone)]
pub struct Prompts {
    moods: Vec<(String, Vec<String>)>,
    pub system: String,
    pub classification: String,
    pub user: String,
    version: String,
}

impl Prompts {
    /// Load the library from `dir`, falling back to the built-in copy per file.
    pub fn load(dir: Option<&Path>) -> Result<Self, Error> {
        let read = |name: &str, builtin: &str| -> Result<String, Error> {
            let Some(dir) = dir else {
                return Ok(builtin.to_string());
            };
            let path = dir.join(name);
            if path.exists() {
                debug!(path = %path.display(), "loading prompt file");
                Ok(std::fs::read_to_string(&path)?)
            } else {
                debug!(file = name, "prompt file missing, using built-in");
                Ok(builtin.to_string())
            }
        };

        let prompts = Self::from_parts(
            &read(PROMPTS_FILE, BUILTIN_PROMPTS)?,
            read(SYSTEM_FILE, BUILTIN_SYSTEM)?,
            read(CLASSIFICATION_FILE, BUILTIN_CLASSIFICATION)?,
            read(USER_FILE, BUILTIN_USER)?,
        )?;

        info!(
            moods = prompts.moods.len(),
            version = %prompts.version,
            "prompt library loaded"
        );
        Ok(prompts)
    }

    pub fn from_parts(
        moods_json: &str,
        system: String,
        classification: String,
        user: String,
    ) -> Result<Self, Error> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(moods_json)?;

        let mut moods = Vec::with_capacity(map.len());
        for (mood, value) in map {
            let prompts: Vec<String> = serde_json::from_value(value)?;
            if prompts.is_empty() {
                return Err(Error::Prompts(format!("mood '{mood}' has no prompts")));
            }
            moods.push((mood, prompts));
        }

        if moods.is_empty() {
            return Err(Error::Prompts("no moods defined".to_string()));
        }

        let version = fingerprint(&[moods_json, &system, &classification, &user]);

        Ok(Self {
            moods,
            system,
            classification,
            user,
            version,
        })
    }

    // in file order
    pub fn moods(&self) -> impl Iterator<Item = &str> {
        self.moods.iter().map(|(m, _)| m.as_str())
    }

    pub fn default_mood(&self) -> &str {
        // from_parts rejects an empty map
        self.moods.first().map(|(m, _)| m.as_str()).unwrap_or_default()
    }

    pub fn prompts_for(&self, mood: &str) -> Option<&[String]> {
        self.moods
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(mood))
            .map(|(_, p)| p.as_slice())
    }

    // canonical spelling of a mood name
    pub fn resolve_mood(&self, mood: &str) -> Option<&str> {
        self.moods
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(mood))
            .map(|(m, _)| m.as_str())
    }

    pub fn opening_prompt(&self, mood: &str) -> Option<&str> {
        self.prompts_for(mood)
            .and_then(|p| p.first())
            .map(String::as_str)
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Substitute `{{key}}` (and `{{ key }}`) tokens. Unknown tokens stay as they are.
/// One pass over the template: substituted values are copied through, never rescanned.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

// fnv-1a, stable across builds
fn fingerprint(parts: &[&str]) -> String {
    let mut hash: u32 = 0x811c_9dc5;
    for part in parts {
        for byte in part.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
    }
    format!("{hash:08x}")
}
