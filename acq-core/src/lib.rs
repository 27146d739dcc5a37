#![forbid(unsafe_code)]

pub mod error;

pub mod container {
    pub mod descriptor;
    pub mod extent;
    pub mod layout;
    pub mod manifest;
}

pub mod codec;
pub mod demux;
pub mod assemble;

pub mod source;
pub mod source_factory;
pub mod source_fs;

pub mod read {
    pub mod chunks;
}

pub mod export {
    pub mod csv;
    pub mod staged;
}

pub mod paths;
pub mod recover;
pub mod report;

// Re-exports: stable API surface
pub use assemble::{RecoveredTable, assemble};
pub use container::descriptor::{ChannelDescriptor, DescriptorTable, Encoding};
pub use container::extent::{DecodableExtent, resolve_extent};
pub use container::layout::{RecordLayout, compute_layout};
pub use demux::demultiplex;
pub use recover::{
    Prepared, RecoveryOptions, SalvageConfig, SalvageHooks, prepare, recover, salvage, salvage_with,
};
