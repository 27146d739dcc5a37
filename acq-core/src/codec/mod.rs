use crate::container::descriptor::Encoding;
use crate::error::{AcqError, Result};

/// Typed samples reinterpreted from one channel's byte run.
#[derive(Clone, Debug, PartialEq)]
pub enum RawSamples {
    Int16(Vec<i16>),
    Float64(Vec<f64>),
}

impl RawSamples {
    pub fn len(&self) -> usize {
        match self {
            RawSamples::Int16(v) => v.len(),
            RawSamples::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait SampleDecoder: Send + Sync {
    /// Reinterpret `bytes` as consecutive little-endian samples. The length
    /// must be a whole number of samples.
    fn decode(&self, bytes: &[u8]) -> Result<RawSamples>;
}

pub mod float64;
pub mod int16;

pub fn get_decoder(encoding: Encoding) -> &'static dyn SampleDecoder {
    match encoding {
        Encoding::Int16Le => &int16::Int16Le,
        Encoding::Float64Le => &float64::Float64Le,
    }
}

pub(crate) fn check_whole(bytes: &[u8], encoding: Encoding) -> Result<()> {
    if bytes.len() % encoding.width() != 0 {
        return Err(AcqError::Invariant(format!(
            "{} bytes is not a whole number of {encoding} samples",
            bytes.len()
        )));
    }
    Ok(())
}
