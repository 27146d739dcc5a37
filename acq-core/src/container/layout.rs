use crate::container::descriptor::DescriptorTable;
use crate::error::{FormatError, Result};
use tracing::debug;

/// Width of the fixed trailing field of the last channel-table entry. The
/// sample stream starts immediately after it.
///
/// Observed on one container revision only; other revisions may differ.
pub const TRAILING_META_LEN: u64 = 4;

/// Where one channel's bytes sit inside a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelSpan {
    pub channel: usize,
    pub start: usize,
    pub width: usize,
}

impl ChannelSpan {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.width
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    spans: Vec<ChannelSpan>,
    stride: usize,
    data_start: u64,
}

impl RecordLayout {
    /// Assemble a layout from contiguous spans in channel order. The stride is
    /// the sum of the widths.
    #[cfg(test)]
    pub(crate) fn from_parts(spans: Vec<ChannelSpan>, data_start: u64) -> Self {
        let stride = spans.iter().map(|s| s.width).sum();
        Self {
            spans,
            stride,
            data_start,
        }
    }

    pub fn spans(&self) -> &[ChannelSpan] {
        &self.spans
    }

    /// Total byte width of one record.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Absolute file offset of the first record.
    pub fn data_start(&self) -> u64 {
        self.data_start
    }

    pub fn channel_count(&self) -> usize {
        self.spans.len()
    }
}

/// Derive the record layout from the descriptor table.
///
/// Offsets within a record are the running sum of the preceding widths. The
/// resulting stride must agree with the stride the metadata reports on its
/// own, otherwise the table was misread and any split would be garbage.
pub fn compute_layout(table: &DescriptorTable) -> Result<RecordLayout> {
    let mut spans = Vec::with_capacity(table.len());
    let mut acc = 0usize;
    for ch in table.channels() {
        let width = ch.width();
        spans.push(ChannelSpan {
            channel: ch.index,
            start: acc,
            width,
        });
        acc += width;
    }

    let computed = acc as u64;
    if computed != table.reported_stride() {
        return Err(FormatError::StrideMismatch {
            computed,
            reported: table.reported_stride(),
        }
        .into());
    }

    let last = table
        .channels()
        .last()
        .ok_or(FormatError::NoChannels)?;
    let data_start = last
        .header_offset
        .checked_add(TRAILING_META_LEN)
        .ok_or(FormatError::HeaderOffsetOverflow {
            channel: last.index,
            header_offset: last.header_offset,
        })?;

    debug!(stride = acc, data_start, channels = spans.len(), "record layout");
    Ok(RecordLayout {
        spans,
        stride: acc,
        data_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::descriptor::{ChannelDescriptor, Encoding};
    use crate::error::AcqError;

    fn table(encs: &[Encoding], reported: u64) -> DescriptorTable {
        let chans = encs
            .iter()
            .enumerate()
            .map(|(i, &encoding)| ChannelDescriptor {
                index: i,
                name: format!("ch{i}"),
                encoding,
                header_offset: 1000 + 4 * i as u64,
                scale: 1.0,
                offset: 0.0,
                samples_per_second: 500.0,
            })
            .collect();
        DescriptorTable::new(chans, reported).unwrap()
    }

    #[test]
    fn spans_are_running_sums() {
        use Encoding::*;
        let t = table(&[Int16Le, Float64Le, Int16Le, Int16Le], 14);
        let l = compute_layout(&t).unwrap();
        let starts: Vec<_> = l.spans().iter().map(|s| s.start).collect();
        assert_eq!(starts, [0, 2, 10, 12]);
        assert_eq!(l.stride(), 14);
        assert_eq!(
            l.spans().iter().map(|s| s.width).sum::<usize>(),
            l.stride()
        );
        assert_eq!(l.spans()[3].end(), 14);
    }

    #[test]
    fn data_start_follows_last_entry() {
        let t = table(&[Encoding::Int16Le, Encoding::Int16Le, Encoding::Float64Le], 12);
        let l = compute_layout(&t).unwrap();
        assert_eq!(l.data_start(), 1008 + TRAILING_META_LEN);
    }

    #[test]
    fn reported_stride_must_agree() {
        let t = table(&[Encoding::Int16Le, Encoding::Float64Le], 12);
        match compute_layout(&t) {
            Err(AcqError::Format(FormatError::StrideMismatch { computed, reported })) => {
                assert_eq!(computed, 10);
                assert_eq!(reported, 12);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn header_offset_at_u64_max_is_rejected() {
        let chans = vec![ChannelDescriptor {
            index: 0,
            name: "SAP".into(),
            encoding: Encoding::Int16Le,
            header_offset: u64::MAX - 1,
            scale: 1.0,
            offset: 0.0,
            samples_per_second: 100.0,
        }];
        let t = DescriptorTable::new(chans, 2).unwrap();
        assert!(matches!(
            compute_layout(&t),
            Err(AcqError::Format(FormatError::HeaderOffsetOverflow {
                channel: 0,
                header_offset
            })) if header_offset == u64::MAX - 1
        ));
    }

    #[test]
    fn from_parts_sums_widths() {
        let l = RecordLayout::from_parts(
            vec![
                ChannelSpan { channel: 0, start: 0, width: 2 },
                ChannelSpan { channel: 1, start: 2, width: 8 },
            ],
            0,
        );
        assert_eq!(l.stride(), 10);
        assert_eq!(l.channel_count(), 2);
    }
}
