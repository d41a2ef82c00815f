use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

// ── Profile ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Base URL of the MediAssist backend
    pub base_url: String,
    /// External speech-to-text command (run via `sh -c`). Each stdout line is
    /// appended to the input buffer. Empty = voice capture unsupported.
    #[serde(default)]
    pub voice_command: String,
    /// External text-to-speech command. Assistant replies are piped to its
    /// stdin when set. Empty = replies are not spoken.
    #[serde(default)]
    pub speak_command: String,
    /// Locale hint exported to the voice commands as MEDIASSIST_LANG
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "es-ES".to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            voice_command: String::new(),
            speak_command: String::new(),
            language: default_language(),
        }
    }
}

// ── Config file ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Which profile to use when none is specified
    #[serde(default = "default_profile_name")]
    pub default_profile: String,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

fn default_profile_name() -> String {
    "default".to_string()
}

impl ConfigFile {
    /// Load from disk, or return a default config if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    /// Write a starter config file to disk (only if it doesn't exist).
    pub fn write_default_if_missing() -> Result<PathBuf> {
        let path = config_path();
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, DEFAULT_CONFIG_TOML)?;
        Ok(path)
    }

    /// Resolve the active profile given an optional override name.
    pub fn resolve_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let key = name.unwrap_or(&self.default_profile);
        self.profiles.get(key)
    }
}

// ── Resolved runtime config (after merging file + CLI overrides) ──────────────

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub voice_command: String,
    pub speak_command: String,
    pub language: String,
    /// Profile name that was resolved (for display)
    pub profile_name: String,
}

impl ResolvedConfig {
    /// Merge config file profile with CLI overrides.
    /// Priority: CLI args > env vars (handled by clap) > config file profile > built-in defaults
    pub fn resolve(
        file: &ConfigFile,
        profile_override: Option<&str>,
        base_url_override: Option<&str>,
    ) -> Self {
        let profile_name = profile_override
            .unwrap_or(&file.default_profile)
            .to_string();

        let base = file
            .resolve_profile(profile_override)
            .cloned()
            .unwrap_or_default();

        Self {
            base_url: base_url_override
                .map(str::to_string)
                .unwrap_or(base.base_url)
                .trim_end_matches('/')
                .to_string(),
            voice_command: base.voice_command,
            speak_command: base.speak_command,
            language: base.language,
            profile_name,
        }
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn config_path() -> PathBuf {
    dirs_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mediassist")
        .join("config.toml")
}

fn dirs_config_dir() -> Option<PathBuf> {
    // XDG_CONFIG_HOME or ~/.config on Linux/macOS
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

// ── Default config template written on first run ──────────────────────────────

const DEFAULT_CONFIG_TOML: &str = r#"# MediAssist client configuration
# Run `mediassist --init` to regenerate this file.

default_profile = "local"

# ── Local backend (default) ───────────────────────────────────────────────────
[profiles.local]
base_url = "http://127.0.0.1:3000"
language = "es-ES"
# voice_command is run via `sh -c` when you press the mic key; every line it
# prints is appended to the input box. Leave empty to disable voice capture.
# voice_command = "vosk-transcriber --lang $MEDIASSIST_LANG"
# speak_command reads each assistant reply on stdin. Leave empty to disable.
# speak_command = "espeak-ng -v es"

# ── Hosted backend example ────────────────────────────────────────────────────
# [profiles.hosted]
# base_url = "https://mediassist.example.com"
# language = "es-ES"
"#;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses() {
        let file: ConfigFile = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(file.default_profile, "local");
        let profile = file.profiles.get("local").unwrap();
        assert_eq!(profile.base_url, "http://127.0.0.1:3000");
        assert_eq!(profile.language, "es-ES");
        assert!(profile.voice_command.is_empty());
    }

    #[test]
    fn cli_override_beats_profile() {
        let mut file = ConfigFile::default();
        file.profiles.insert(
            "p".into(),
            Profile { base_url: "http://profile:1".into(), ..Profile::default() },
        );
        file.default_profile = "p".into();

        let resolved = ResolvedConfig::resolve(&file, None, Some("http://cli:2/"));
        assert_eq!(resolved.base_url, "http://cli:2");
        assert_eq!(resolved.profile_name, "p");
    }

    #[test]
    fn unknown_profile_falls_back_to_defaults() {
        let file = ConfigFile::default();
        let resolved = ResolvedConfig::resolve(&file, Some("missing"), None);
        assert_eq!(resolved.base_url, "http://127.0.0.1:3000");
        assert_eq!(resolved.profile_name, "missing");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let file = ConfigFile::default();
        let resolved = ResolvedConfig::resolve(&file, None, Some("http://x/"));
        assert_eq!(resolved.base_url, "http://x");
    }
}
