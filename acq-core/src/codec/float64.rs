use super::{RawSamples, SampleDecoder, check_whole};
use crate::container::descriptor::Encoding;
use crate::error::Result;

pub struct Float64Le;

#[inline]
fn le64(x: &[u8]) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(x);
    f64::from_le_bytes(b)
}

impl SampleDecoder for Float64Le {
    fn decode(&self, bytes: &[u8]) -> Result<RawSamples> {
        check_whole(bytes, Encoding::Float64Le)?;
        Ok(RawSamples::Float64(bytes.chunks_exact(8).map(le64).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_exact_reinterpretation() {
        let vals = [0.0f64, -0.0, 1.5, f64::MIN_POSITIVE, -72.25];
        let bytes: Vec<u8> = vals.iter().flat_map(|v| v.to_le_bytes()).collect();
        let RawSamples::Float64(out) = Float64Le.decode(&bytes).unwrap() else {
            panic!("wrong variant");
        };
        for (a, b) in vals.iter().zip(&out) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn short_tail_rejected() {
        assert!(Float64Le.decode(&[0u8; 12]).is_err());
    }
}
