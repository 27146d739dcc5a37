use super::{RawSamples, SampleDecoder, check_whole};
use crate::container::descriptor::Encoding;
use crate::error::Result;

pub struct Int16Le;

impl SampleDecoder for Int16Le {
    fn decode(&self, bytes: &[u8]) -> Result<RawSamples> {
        check_whole(bytes, Encoding::Int16Le)?;
        Ok(RawSamples::Int16(
            bytes
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]))
                .collect(),
        ))
    }
}
