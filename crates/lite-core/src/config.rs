//! Deployment configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, and
//! `LITE_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use lite_archive::{ExtractOptions, METADATA_ENTRY, WriteOptions};
use serde::{Deserialize, Serialize};

use crate::codec::{Codec, Encoding};
use crate::error::Result;

pub const CONFIG_FILE_NAME: &str = "lite.toml";
pub const ENV_PREFIX: &str = "LITE_";
/// Overrides the default storage root without going through figment.
pub const ROOT_ENV: &str = "LITE_ROOT";
/// Room for the record's JSON keys, file name and extension around the payload.
const RECORD_OVERHEAD_BYTES: u64 = 64 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_root: PathBuf,
    pub container_suffix: String,
    pub metadata_entry: String,
    pub codec: Encoding,
    pub compression_level: u32,
    pub max_source_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            container_suffix: ".b3d".to_string(),
            metadata_entry: METADATA_ENTRY.to_string(),
            codec: Encoding::default(),
            compression_level: 9,
            max_source_bytes: 256 * 1024 * 1024,
        }
    }
}

/// `$LITE_ROOT`, else `~/.lite`, else a directory under the system temp dir.
pub fn default_storage_root() -> PathBuf {
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(root);
    }
    home::home_dir()
        .map(|home| home.join(".lite"))
        .unwrap_or_else(|| std::env::temp_dir().join("lite"))
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit `file` must exist. Without one, `<default root>/lite.toml`
    /// is merged when present.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let figment = Figment::from(Serialized::defaults(&defaults));

        let figment = match file {
            Some(path) if !path.is_file() => {
                return Err(figment::Error::from(format!(
                    "config file '{}' does not exist",
                    path.display()
                ))
                .into());
            }
            Some(path) => figment.merge(Toml::file(path)),
            None => figment.merge(Toml::file(defaults.storage_root.join(CONFIG_FILE_NAME))),
        };

        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;
        tracing::debug!(
            root = %config.storage_root.display(),
            codec = %config.codec,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(figment::Error::from(msg).into()) };

        if self.container_suffix.is_empty() || has_separator(&self.container_suffix) {
            return invalid(format!(
                "container_suffix '{}' must be non-empty and contain no path separator",
                self.container_suffix
            ));
        }
        if matches!(self.metadata_entry.as_str(), "" | "." | "..")
            || has_separator(&self.metadata_entry)
        {
            return invalid(format!(
                "metadata_entry '{}' must be a plain file name",
                self.metadata_entry
            ));
        }
        if self.compression_level > 9 {
            return invalid(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            ));
        }
        if self.max_source_bytes == 0 {
            return invalid("max_source_bytes must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn codec(&self) -> Codec {
        Codec::new(self.codec)
            .level(self.compression_level)
            .max_decoded(self.max_source_bytes)
    }

    /// Largest metadata record a container may carry: the encoded form of a
    /// `max_source_bytes` source plus the JSON around it.
    pub fn max_record_bytes(&self) -> u64 {
        self.codec()
            .max_encoded_len(self.max_source_bytes)
            .saturating_add(RECORD_OVERHEAD_BYTES)
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.storage_root.join("sessions")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.storage_root.join("uploads")
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::default()
            .entry_name(self.metadata_entry.as_str())
            .target_name(self.metadata_entry.as_str())
            .max_entry_bytes(self.max_record_bytes())
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions::default().compression_level(u8::try_from(self.compression_level).ok())
    }
}

fn has_separator(s: &str) -> bool {
    s.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults() {
        Jail::expect_with(|jail| {
            jail.set_env(ROOT_ENV, "/srv/lite");
            let config = Config::default();
            assert_eq!(config.storage_root, PathBuf::from("/srv/lite"));
            assert_eq!(config.container_suffix, ".b3d");
            assert_eq!(config.metadata_entry, "metadata.bin");
            assert_eq!(config.codec, Encoding::ZlibBase64);
            assert_eq!(config.compression_level, 9);
            assert_eq!(config.max_source_bytes, 268_435_456);
            assert_eq!(config.sessions_dir(), PathBuf::from("/srv/lite/sessions"));
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.set_env(ROOT_ENV, jail.directory().display().to_string());
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
                    codec = "hex"
                    container_suffix = ".pack"
                    compression_level = 3
                "#,
            )?;
            jail.set_env("LITE_COMPRESSION_LEVEL", "6");

            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.codec, Encoding::Hex);
            assert_eq!(config.container_suffix, ".pack");
            assert_eq!(config.compression_level, 6);
            assert_eq!(config.metadata_entry, "metadata.bin");
            Ok(())
        });
    }

    #[test]
    fn explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", r#"codec = "zlib-hex""#)?;
            let config = Config::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.codec, Encoding::ZlibHex);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        Jail::expect_with(|_| {
            let err = Config::load(Some(Path::new("nowhere.toml"))).unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn env_selects_codec() {
        Jail::expect_with(|jail| {
            jail.set_env(ROOT_ENV, jail.directory().display().to_string());
            jail.set_env("LITE_CODEC", "base64");
            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.codec, Encoding::Base64);
            Ok(())
        });
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config {
            compression_level: 12,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config.compression_level = 9;
        config.metadata_entry = "../escape".into();
        assert!(config.validate().is_err());

        config.metadata_entry = "metadata.bin".into();
        config.container_suffix = String::new();
        assert!(config.validate().is_err());

        config.container_suffix = ".b3d".into();
        config.max_source_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn recovery_ceilings_follow_source_limit() {
        let config = Config {
            codec: Encoding::Hex,
            max_source_bytes: 1000,
            ..Config::default()
        };
        assert_eq!(config.max_record_bytes(), 2000 + 64 * 1024);
        assert_eq!(
            config.extract_options().max_entry_bytes,
            Some(config.max_record_bytes())
        );

        let text = config.codec().encode(&[1u8; 1001]).unwrap();
        assert!(config.codec().decode(&text).is_err());
        let text = config.codec().encode(&[1u8; 1000]).unwrap();
        assert_eq!(config.codec().decode(&text).unwrap().len(), 1000);
    }

    #[test]
    fn unknown_codec_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env(ROOT_ENV, jail.directory().display().to_string());
            jail.set_env("LITE_CODEC", "rot13");
            assert!(Config::load(None).is_err());
            Ok(())
        });
    }
}
