use crate::assemble::{RecoveredTable, assemble};
use crate::container::descriptor::DescriptorTable;
use crate::container::extent::{DecodableExtent, resolve_extent};
use crate::container::layout::{RecordLayout, compute_layout};
use crate::container::manifest::{LayoutManifest, sidecar_path};
use crate::demux::Demultiplexer;
use crate::error::{AcqError, Result};
use crate::export::csv::write_csv;
use crate::export::staged::StagedOutputs;
use crate::paths::{check_source, export_path};
use crate::read::chunks::RecordChunks;
use crate::report::SalvageReport;
use crate::source::{OpenParams, RecordSource};
use crate::source_factory::{Backend, open_source};
use serde::Deserialize;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::{debug, info};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecoveryOptions {
    /// Records per sequential read. 0 reads the whole extent at once.
    pub chunk_records: usize,
    /// When true, the report carries a zero timestamp.
    pub deterministic: bool,
}

/// Layout and extent for a source, resolved without reading any samples.
#[derive(Clone, Debug)]
pub struct Plan {
    pub layout: RecordLayout,
    pub extent: DecodableExtent,
}

pub fn plan(table: &DescriptorTable, file_size: u64) -> Result<Plan> {
    let layout = compute_layout(table)?;
    let extent = resolve_extent(file_size, &layout)?;
    Ok(Plan { layout, extent })
}

#[derive(Debug)]
pub struct Recovery {
    pub plan: Plan,
    pub table: RecoveredTable,
    pub report: SalvageReport,
}

/// Run the whole pipeline over an open source: layout, extent, chunked read,
/// demultiplex, calibrate. Either every channel comes back for the resolved
/// record count or the run fails.
pub fn recover(
    src: &dyn RecordSource,
    descriptors: &DescriptorTable,
    opts: &RecoveryOptions,
) -> Result<Recovery> {
    let plan = plan(descriptors, src.size())?;
    let ext = plan.extent;

    let mut demux = Demultiplexer::new(&plan.layout, ext.record_count);
    let mut hasher = blake3::Hasher::new();
    let chunks = RecordChunks::new(src, &ext, opts.chunk_records)?;
    debug!(chunk_bytes = chunks.chunk_bytes(), "reading extent");
    for chunk in chunks {
        let chunk = chunk?;
        hasher.update(&chunk);
        demux.push(&chunk)?;
    }
    let runs = demux.finish()?;
    let table = assemble(runs, descriptors)?;

    let recovered_at = if opts.deterministic {
        0
    } else {
        OffsetDateTime::now_utc().unix_timestamp()
    };
    let report = SalvageReport::new(
        descriptors,
        &plan.layout,
        &ext,
        hasher.finalize(),
        recovered_at,
    );
    info!(
        records = ext.record_count,
        channels = table.channel_count(),
        dropped = ext.dropped_tail(),
        "recovered"
    );
    Ok(Recovery {
        plan,
        table,
        report,
    })
}

/// Everything a salvage run needs, passed explicitly.
#[derive(Clone, Debug)]
pub struct SalvageConfig {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Layout manifest; defaults to the `<source>.layout.json` sidecar.
    pub layout: Option<PathBuf>,
    /// JSON salvage report, committed together with the CSV.
    pub report: Option<PathBuf>,
    pub backend: Backend,
    pub options: RecoveryOptions,
}

impl SalvageConfig {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            layout: None,
            report: None,
            backend: Backend::default(),
            options: RecoveryOptions::default(),
        }
    }

    pub fn layout_path(&self) -> PathBuf {
        self.layout
            .clone()
            .unwrap_or_else(|| sidecar_path(&self.source))
    }

    pub fn export_path(&self) -> PathBuf {
        export_path(&self.dest)
    }
}

/// A source that is open and planned, with no sample read yet.
pub struct Prepared {
    pub manifest: LayoutManifest,
    pub descriptors: DescriptorTable,
    pub plan: Plan,
    source: Box<dyn RecordSource>,
}

impl Prepared {
    pub fn recover(&self, opts: &RecoveryOptions) -> Result<Recovery> {
        let mut rec = recover(self.source.as_ref(), &self.descriptors, opts)?;
        rec.report.revision = self.manifest.revision.clone();
        Ok(rec)
    }
}

/// Validate the source name, load its layout manifest, open it, and resolve
/// layout and extent.
pub fn prepare(cfg: &SalvageConfig) -> Result<Prepared> {
    check_source(&cfg.source)?;
    let manifest = LayoutManifest::load(&cfg.layout_path())?;
    let descriptors = manifest.clone().into_table()?;
    let source = open_source(
        cfg.backend,
        OpenParams {
            source_path: cfg.source.clone(),
        },
    )?;
    let plan = plan(&descriptors, source.size())?;
    Ok(Prepared {
        manifest,
        descriptors,
        plan,
        source,
    })
}

/// Caller hooks into [`salvage_with`].
pub trait SalvageHooks {
    /// Runs once layout and extent are known, before any sample is read.
    /// Returning `false` ends the run there with nothing written.
    fn planned(&mut self, _prepared: &Prepared) -> Result<bool> {
        Ok(true)
    }

    /// Stage additional outputs; they are committed with the CSV.
    fn stage(&mut self, _rec: &Recovery, _staged: &mut StagedOutputs) -> Result<()> {
        Ok(())
    }
}

impl SalvageHooks for () {}

/// Recover `cfg.source` and export it as CSV, plus the report when one is
/// configured. Nothing is written unless the whole run succeeds.
pub fn salvage(cfg: &SalvageConfig) -> Result<Recovery> {
    salvage_with(cfg, &mut ())?
        .ok_or_else(|| AcqError::Invariant("salvage stopped after planning".into()))
}

/// [`salvage`], with `hooks` consulted after planning and before commit.
/// Returns `None` when the hooks stop the run after planning.
pub fn salvage_with(cfg: &SalvageConfig, hooks: &mut dyn SalvageHooks) -> Result<Option<Recovery>> {
    let prepared = prepare(cfg)?;
    if !hooks.planned(&prepared)? {
        debug!(source = %cfg.source.display(), "stopped after planning");
        return Ok(None);
    }
    let rec = prepared.recover(&cfg.options)?;

    let mut staged = StagedOutputs::new();
    staged.stage(&cfg.export_path(), |_, f| write_csv(&rec.table, f))?;
    if let Some(path) = &cfg.report {
        staged.stage(path, |_, f| {
            let mut w = BufWriter::new(f);
            rec.report.write_json(&mut w)?;
            w.flush()?;
            Ok(())
        })?;
    }
    hooks.stage(&rec, &mut staged)?;
    debug!(outputs = ?staged.destinations().collect::<Vec<_>>(), "committing");
    staged.commit()?;
    Ok(Some(rec))
}
