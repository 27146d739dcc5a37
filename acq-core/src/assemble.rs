use crate::codec::{RawSamples, get_decoder};
use crate::container::descriptor::{ChannelDescriptor, DescriptorTable};
use crate::error::{AcqError, Result};

/// One channel's recovered samples, raw and calibrated.
#[derive(Clone, Debug)]
pub struct ChannelSampleBuffer {
    pub channel: usize,
    pub raw: RawSamples,
    pub calibrated: Vec<f64>,
}

impl ChannelSampleBuffer {
    /// Decode a channel's byte run and apply `raw * scale + offset`.
    pub fn decode(desc: &ChannelDescriptor, bytes: &[u8]) -> Result<Self> {
        let raw = get_decoder(desc.encoding).decode(bytes)?;
        let calibrated = calibrate(&raw, desc.scale, desc.offset);
        Ok(Self {
            channel: desc.index,
            raw,
            calibrated,
        })
    }

    pub fn len(&self) -> usize {
        self.calibrated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calibrated.is_empty()
    }
}

/// Affine calibration in double precision. Identity calibration copies the
/// raw values through untouched so float channels stay bit-exact.
pub fn calibrate(raw: &RawSamples, scale: f64, offset: f64) -> Vec<f64> {
    let identity = scale == 1.0 && offset == 0.0;
    match raw {
        RawSamples::Int16(v) => v
            .iter()
            .map(|&x| {
                let x = f64::from(x);
                if identity { x } else { x * scale + offset }
            })
            .collect(),
        RawSamples::Float64(v) if identity => v.clone(),
        RawSamples::Float64(v) => v.iter().map(|&x| x * scale + offset).collect(),
    }
}

/// The assembled result: index and time columns plus one calibrated column
/// per channel, all the same length.
#[derive(Clone, Debug)]
pub struct RecoveredTable {
    names: Vec<String>,
    sample_rate: f64,
    channels: Vec<ChannelSampleBuffer>,
    records: usize,
}

impl RecoveredTable {
    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Time base of the table (channel 0's rate).
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn buffers(&self) -> &[ChannelSampleBuffer] {
        &self.channels
    }

    pub fn column(&self, channel: usize) -> Option<&[f64]> {
        self.channels.get(channel).map(|b| b.calibrated.as_slice())
    }

    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        let i = self.names.iter().position(|n| n == name)?;
        self.column(i)
    }

    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.records).map(|i| self.time_at(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.records).map(|index| Row { table: self, index })
    }
}

/// A borrowed view of one record: (index, time, values in channel order).
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a RecoveredTable,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn time(&self) -> f64 {
        self.table.time_at(self.index)
    }

    pub fn values(self) -> impl Iterator<Item = f64> + 'a {
        let i = self.index;
        self.table.channels.iter().map(move |b| b.calibrated[i])
    }
}

/// Decode and calibrate every channel run, then assemble the table.
///
/// `runs` is indexed by channel and must come from the demultiplexer for the
/// same descriptor table.
pub fn assemble(runs: Vec<Vec<u8>>, table: &DescriptorTable) -> Result<RecoveredTable> {
    if runs.len() != table.len() {
        return Err(AcqError::Invariant(format!(
            "{} channel runs for {} descriptors",
            runs.len(),
            table.len()
        )));
    }

    let mut channels = Vec::with_capacity(runs.len());
    for (desc, bytes) in table.channels().iter().zip(runs) {
        // the run is released as soon as it is decoded
        channels.push(ChannelSampleBuffer::decode(desc, &bytes)?);
    }

    let records = channels.first().map_or(0, ChannelSampleBuffer::len);
    if let Some(bad) = channels.iter().find(|b| b.len() != records) {
        return Err(AcqError::Invariant(format!(
            "channel {} has {} samples, channel 0 has {records}",
            bad.channel,
            bad.len()
        )));
    }

    Ok(RecoveredTable {
        names: table.names().map(str::to_string).collect(),
        sample_rate: table.base_rate(),
        channels,
        records,
    })
}
