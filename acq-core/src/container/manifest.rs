use crate::container::descriptor::{ChannelDescriptor, DescriptorTable, Encoding};
use crate::error::{AcqError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// One channel entry as read from the container's channel table.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChannelEntry {
    pub name: String,
    /// Declared encoding tag (`Int16LE`, `<i2`, `Float64LE`, `<f8`).
    pub encoding: String,
    pub header_offset: u64,
    pub scale: f64,
    pub offset: f64,
    pub samples_per_second: f64,
    /// Sample size reported by the channel header itself.
    pub sample_size: u64,
}

/// The intact leading metadata of a container, delivered as a sidecar
/// document next to the damaged file.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct LayoutManifest {
    /// Free-form format revision label, informational only.
    #[serde(default)]
    pub revision: Option<String>,
    pub channels: Vec<ChannelEntry>,
}

impl LayoutManifest {
    pub fn from_json(r: impl Read) -> Result<Self> {
        serde_json::from_reader(r).map_err(|e| AcqError::Manifest(format!("json decode: {e}")))
    }

    pub fn from_cbor(r: impl Read) -> Result<Self> {
        ciborium::de::from_reader(r).map_err(|e| AcqError::Manifest(format!("cbor decode: {e}")))
    }

    /// Load a manifest, picking the decoder from the file extension
    /// (`.cbor` is CBOR, anything else is JSON).
    pub fn load(path: &Path) -> Result<Self> {
        let f = BufReader::new(File::open(path).map_err(|e| {
            AcqError::Manifest(format!("cannot open {}: {e}", path.display()))
        })?);
        let is_cbor = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("cbor"));
        if is_cbor {
            Self::from_cbor(f)
        } else {
            Self::from_json(f)
        }
    }

    /// Validate the entries into an ordered descriptor table. Channel ordinals
    /// are array positions.
    pub fn into_table(self) -> Result<DescriptorTable> {
        let mut reported = 0u64;
        let mut channels = Vec::with_capacity(self.channels.len());
        for (index, e) in self.channels.into_iter().enumerate() {
            let encoding = Encoding::from_tag(index, &e.encoding)?;
            reported = reported.checked_add(e.sample_size).ok_or_else(|| {
                AcqError::Manifest("reported sample sizes overflow".to_string())
            })?;
            channels.push(ChannelDescriptor {
                index,
                name: e.name,
                encoding,
                header_offset: e.header_offset,
                scale: e.scale,
                offset: e.offset,
                samples_per_second: e.samples_per_second,
            });
        }
        DescriptorTable::new(channels, reported)
    }
}

/// Default sidecar location: `<source>.layout.json`.
pub fn sidecar_path(source: &Path) -> PathBuf {
    let mut s = source.as_os_str().to_owned();
    s.push(".layout.json");
    PathBuf::from(s)
}
