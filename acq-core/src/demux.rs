use crate::container::layout::RecordLayout;
use crate::error::{AcqError, Result};

/// For every byte position within a record, the channel that owns it.
/// Built once per layout.
#[derive(Clone, Debug)]
pub struct SpanTable {
    owner: Vec<usize>,
}

impl SpanTable {
    pub fn new(layout: &RecordLayout) -> Self {
        let mut owner = vec![0usize; layout.stride()];
        for span in layout.spans() {
            for slot in &mut owner[span.start..span.end()] {
                *slot = span.channel;
            }
        }
        Self { owner }
    }

    #[inline]
    pub fn owner(&self, pos: usize) -> usize {
        self.owner[pos]
    }

    pub fn stride(&self) -> usize {
        self.owner.len()
    }
}

/// Splits an interleaved record stream into one contiguous byte run per
/// channel. Fed whole records, one or more at a time.
pub struct Demultiplexer {
    table: SpanTable,
    widths: Vec<usize>,
    runs: Vec<Vec<u8>>,
    records: u64,
}

impl Demultiplexer {
    /// `expected_records` only sizes the output buffers.
    pub fn new(layout: &RecordLayout, expected_records: u64) -> Self {
        let n = layout.channel_count();
        let mut widths = vec![0usize; n];
        for span in layout.spans() {
            widths[span.channel] = span.width;
        }
        let runs = widths
            .iter()
            .map(|&w| Vec::with_capacity(w.saturating_mul(expected_records as usize)))
            .collect();
        Self {
            table: SpanTable::new(layout),
            widths,
            runs,
            records: 0,
        }
    }

    /// Consume a block of whole records.
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        let stride = self.table.stride();
        if stride == 0 || chunk.len() % stride != 0 {
            return Err(AcqError::Invariant(format!(
                "chunk of {} bytes is not aligned to record stride {stride}",
                chunk.len()
            )));
        }
        for record in chunk.chunks_exact(stride) {
            for (pos, &b) in record.iter().enumerate() {
                self.runs[self.table.owner(pos)].push(b);
            }
        }
        self.records += (chunk.len() / stride) as u64;
        Ok(())
    }

    /// Hand out the per-channel runs, indexed by channel.
    pub fn finish(self) -> Result<Vec<Vec<u8>>> {
        for (c, (run, &w)) in self.runs.iter().zip(&self.widths).enumerate() {
            let want = self.records * w as u64;
            if run.len() as u64 != want {
                return Err(AcqError::Invariant(format!(
                    "channel {c} run has {} bytes, expected {want}",
                    run.len()
                )));
            }
        }
        Ok(self.runs)
    }
}

/// One-shot demultiplex of a fully buffered extent.
pub fn demultiplex(raw: &[u8], layout: &RecordLayout) -> Result<Vec<Vec<u8>>> {
    let stride = layout.stride().max(1);
    let mut d = Demultiplexer::new(layout, (raw.len() / stride) as u64);
    d.push(raw)?;
    d.finish()
}

/// Inverse of [`demultiplex`]: weave per-channel runs back into records.
pub fn interleave(runs: &[Vec<u8>], layout: &RecordLayout) -> Result<Vec<u8>> {
    if runs.len() != layout.channel_count() {
        return Err(AcqError::Invariant(format!(
            "{} runs for {} channels",
            runs.len(),
            layout.channel_count()
        )));
    }
    let Some(first) = layout.spans().first() else {
        return Ok(Vec::new());
    };
    let records = runs[first.channel].len() / first.width.max(1);
    for span in layout.spans() {
        if runs[span.channel].len() != records * span.width {
            return Err(AcqError::Invariant(format!(
                "channel {} run length disagrees with {records} records",
                span.channel
            )));
        }
    }
    let mut out = Vec::with_capacity(records * layout.stride());
    for r in 0..records {
        for span in layout.spans() {
            let at = r * span.width;
            out.extend_from_slice(&runs[span.channel][at..at + span.width]);
        }
    }
    Ok(out)
}
