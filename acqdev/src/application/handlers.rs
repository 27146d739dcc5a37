use std::path::PathBuf;
#[cfg(any(feature = "plot", test))]
use std::path::Path;

use acq_core::container::descriptor::DescriptorTable;
use acq_core::error::Result;
use acq_core::recover::{
    Plan, Prepared, RecoveryOptions, SalvageConfig, SalvageHooks, salvage_with,
};
use acq_core::source_factory::Backend;
#[cfg(feature = "plot")]
use acq_core::{error::AcqError, export::staged::StagedOutputs, recover::Recovery};

pub struct SalvageArgs {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub layout: Option<PathBuf>,
    pub chunk_records: usize,
    pub report: Option<PathBuf>,
    pub deterministic: bool,
    pub dry_run: bool,
    pub in_memory: bool,
    #[cfg(feature = "plot")]
    pub plot: Option<String>,
}

fn print_channel_table(table: &DescriptorTable) {
    println!("Channel data:");
    for ch in table.channels() {
        println!(
            "\t{:32}: offset = {:5}, sz = {}, enc = {}",
            ch.name,
            ch.header_offset,
            ch.width(),
            ch.encoding
        );
    }
}

fn print_plan(p: &Plan) {
    let e = &p.extent;
    println!("block_sz_bytes = {}", p.layout.stride());
    println!("data_offset = {}", e.data_start);
    println!(
        "records = {} ({} bytes), dropped tail = {} bytes of {}",
        e.record_count,
        e.byte_len,
        e.dropped_tail(),
        e.file_size
    );
}

/// Console side of a salvage run: prints what was resolved, honours
/// `--dry-run`, and stages the optional plot with the other outputs.
struct Console {
    export: PathBuf,
    dry_run: bool,
    #[cfg(feature = "plot")]
    source: PathBuf,
    #[cfg(feature = "plot")]
    plot: Option<String>,
}

impl SalvageHooks for Console {
    fn planned(&mut self, prepared: &Prepared) -> Result<bool> {
        print_channel_table(&prepared.descriptors);
        print_plan(&prepared.plan);
        #[cfg(feature = "plot")]
        if let Some(channel) = &self.plot {
            if !prepared.descriptors.names().any(|n| n == channel) {
                return Err(AcqError::UnknownChannel(channel.clone()));
            }
        }
        if self.dry_run {
            return Ok(false);
        }
        println!("Exporting to '{}'...", self.export.display());
        Ok(true)
    }

    #[cfg(feature = "plot")]
    fn stage(&mut self, rec: &Recovery, staged: &mut StagedOutputs) -> Result<()> {
        match &self.plot {
            Some(channel) => stage_plot(rec, channel, &self.source, &self.export, staged),
            None => Ok(()),
        }
    }
}

pub fn handle_salvage(args: SalvageArgs) -> Result<()> {
    let cfg = SalvageConfig {
        source: args.source,
        dest: args.dest,
        layout: args.layout,
        report: args.report,
        backend: if args.in_memory { Backend::Mem } else { Backend::Fs },
        options: RecoveryOptions {
            chunk_records: args.chunk_records,
            deterministic: args.deterministic,
        },
    };
    let mut console = Console {
        export: cfg.export_path(),
        dry_run: args.dry_run,
        #[cfg(feature = "plot")]
        source: cfg.source.clone(),
        #[cfg(feature = "plot")]
        plot: args.plot,
    };
    salvage_with(&cfg, &mut console)?;
    Ok(())
}

#[cfg(any(feature = "plot", test))]
fn plot_path(export: &Path, channel: &str) -> PathBuf {
    let safe: String = channel
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    export.with_extension(format!("{safe}.png"))
}

#[cfg(feature = "plot")]
fn stage_plot(
    rec: &Recovery,
    channel: &str,
    source: &Path,
    export: &Path,
    staged: &mut StagedOutputs,
) -> Result<()> {
    let values = rec
        .table
        .column_by_name(channel)
        .ok_or_else(|| AcqError::UnknownChannel(channel.to_string()))?;
    let times: Vec<f64> = rec.table.times().collect();
    let out = plot_path(export, channel);
    println!("Sanity check: {channel} plot -> '{}'", out.display());
    staged.stage(&out, |tmp, _| {
        crate::presentation::plot::plot_channel(
            &times,
            values,
            channel,
            &source.display().to_string(),
            tmp,
        )
        .map_err(|e| AcqError::Io(std::io::Error::other(e.to_string())))
    })
}
