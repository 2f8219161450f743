//! Configuration Module
//!
//! Describes which resources the `footprint` tool evaluates. Loaded from a
//! TOML file; the defaults cover the standard texture scenarios.

use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::format::Format;
use crate::protocol::{ResourceDesc, ResourceDimension, SampleDesc};

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Byte offset the first footprint of every resource is placed at
    #[serde(default)]
    pub base_offset: u64,

    /// Resources to lay out
    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceConfig>,
}

/// One resource and the subresource range to lay out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,

    pub dimension: ResourceDimension,

    /// DXGI format name, e.g. "R8G8B8A8_UNORM"
    #[serde(default = "default_format")]
    pub format: String,

    pub width: u64,

    #[serde(default = "default_one")]
    pub height: u32,

    #[serde(default = "default_one_u16")]
    pub depth_or_array_size: u16,

    /// 0 = full mip chain
    #[serde(default = "default_one_u16")]
    pub mip_levels: u16,

    #[serde(default = "default_one")]
    pub sample_count: u32,

    #[serde(default)]
    pub sample_quality: u32,

    #[serde(default)]
    pub first_subresource: u32,

    /// All remaining subresources when absent
    #[serde(default)]
    pub num_subresources: Option<u32>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "UNKNOWN".to_string()
}

fn default_one() -> u32 {
    1
}

fn default_one_u16() -> u16 {
    1
}

fn texture2d(name: &str, format: &str, depth_or_array_size: u16, mip_levels: u16) -> ResourceConfig {
    ResourceConfig {
        name: name.to_string(),
        dimension: ResourceDimension::Texture2D,
        format: format.to_string(),
        width: 100,
        height: 100,
        depth_or_array_size,
        mip_levels,
        sample_count: 1,
        sample_quality: 0,
        first_subresource: 0,
        num_subresources: None,
    }
}

fn default_resources() -> Vec<ResourceConfig> {
    vec![
        texture2d("single", "R8G8B8A8_UNORM", 1, 1),
        texture2d("mip-chain", "R8G8B8A8_UNORM", 1, 0),
        texture2d("array-slices", "R8G8B8A8_UNORM", 5, 1),
        texture2d("planes", "NV12", 1, 1),
        texture2d("comprehensive", "R8G8B8A8_UNORM", 5, 0),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            base_offset: 0,
            resources: default_resources(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ResourceConfig {
    /// Build the resource description this entry names.
    pub fn to_desc(&self) -> Result<ResourceDesc> {
        let format = Format::from_name(&self.format)
            .ok_or_else(|| anyhow!("{}: unknown format '{}'", self.name, self.format))?;

        let mut desc = match self.dimension {
            ResourceDimension::Buffer => ResourceDesc::buffer(self.width),
            ResourceDimension::Texture1D => {
                ResourceDesc::tex1d(format, self.width, self.depth_or_array_size, self.mip_levels)
            }
            ResourceDimension::Texture2D => ResourceDesc::tex2d(
                format,
                self.width,
                self.height,
                self.depth_or_array_size,
                self.mip_levels,
            ),
            ResourceDimension::Texture3D => ResourceDesc::tex3d(
                format,
                self.width,
                self.height,
                self.depth_or_array_size,
                self.mip_levels,
            ),
            ResourceDimension::Unknown => {
                return Err(anyhow!("{}: resource dimension is unknown", self.name))
            }
        };

        // Keep what the file says so validation sees it.
        desc.format = format;
        desc.height = self.height;
        desc.depth_or_array_size = self.depth_or_array_size;
        desc.mip_levels = self.mip_levels;
        desc.sample_desc = SampleDesc {
            count: self.sample_count,
            quality: self.sample_quality,
        };
        Ok(desc)
    }

    /// Resolve the requested range against the resource's subresource count.
    pub fn range(&self, desc: &ResourceDesc) -> Result<(u32, u32)> {
        let count = match self.num_subresources {
            Some(count) => count,
            None => desc
                .subresource_count()?
                .checked_sub(self.first_subresource)
                .ok_or_else(|| {
                    anyhow!(
                        "{}: first_subresource {} is past the end",
                        self.name,
                        self.first_subresource
                    )
                })?,
        };
        Ok((self.first_subresource, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_scenarios() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        let names: Vec<_> = config.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["single", "mip-chain", "array-slices", "planes", "comprehensive"]
        );
        for resource in &config.resources {
            resource.to_desc().unwrap();
        }
    }

    #[test]
    fn test_parse_minimal() {
        let config = Config::parse(
            r#"
            base_offset = 1024

            [[resources]]
            name = "bc"
            dimension = "texture2d"
            format = "DXGI_FORMAT_BC1_UNORM"
            width = 64
            height = 64
            mip_levels = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.base_offset, 1024);
        assert_eq!(config.resources.len(), 1);

        let resource = &config.resources[0];
        let desc = resource.to_desc().unwrap();
        assert_eq!(desc.format, Format::BC1_UNORM);
        assert_eq!(desc.depth_or_array_size, 1);
        assert_eq!(desc.sample_desc.count, 1);
        assert_eq!(resource.range(&desc).unwrap(), (0, 7));
    }

    #[test]
    fn test_buffer_entry() {
        let config = Config::parse(
            r#"
            [[resources]]
            name = "staging"
            dimension = "buffer"
            width = 4096
            "#,
        )
        .unwrap();
        let desc = config.resources[0].to_desc().unwrap();
        assert_eq!(desc, ResourceDesc::buffer(4096));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut resource = default_resources().remove(0);
        resource.format = "R1_UNORM".to_string();
        let err = resource.to_desc().unwrap_err();
        assert!(err.to_string().contains("unknown format 'R1_UNORM'"));
    }

    #[test]
    fn test_range_past_end() {
        let mut resource = default_resources().remove(0);
        resource.first_subresource = 3;
        let desc = resource.to_desc().unwrap();
        assert!(resource.range(&desc).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "copyable-footprint-config-{}.toml",
            std::process::id()
        ));
        let config = Config::default();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.resources, config.resources);
    }
}
