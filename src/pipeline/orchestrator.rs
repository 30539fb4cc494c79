// In: src/pipeline/orchestrator.rs

use crate::config::ConvertConfig;
use crate::container::{ContainerReader, ContainerWriter, DeferredZipWriter, ZipContainerReader};
use crate::error::{ConvertError, Result};
use crate::format::{HEADER_ENTRY, METADATA_ENTRY, VERSION_ENTRY};
use crate::header::{self, ChannelSet, HeaderDocument, ParsedHeader};
use crate::metadata;
use crate::pipeline::dispatch::{ConversionState, Dispatcher, PipelineKind};
use crate::pipeline::report::ConversionReport;
use crate::pipeline::{analog, logic};

//==================================================================================
// 1. Public Orchestration API
//==================================================================================

/// Converts the `.dsl` at `config.input` into a `.sr` at `config.output`.
///
/// Both archives live only for the duration of this call. The output file is
/// created with the first entry, after the header has been validated, so a
/// rejected header leaves an existing file at `config.output` untouched. A
/// failure during the data pipeline leaves a truncated session behind.
pub fn convert_files(config: &ConvertConfig) -> Result<ConversionReport> {
    let mut input = ZipContainerReader::open(&config.input)?;
    let mut output = DeferredZipWriter::new(&config.output, config.compression);

    let report = Orchestrator::new(config).run(&mut input, &mut output)?;
    output.finish()?;
    Ok(report)
}

/// Drives one conversion: parse, dispatch, per-block pipeline, metadata.
///
/// The orchestrator owns the dispatcher, so after `run` returns the final
/// state can be inspected through [`Orchestrator::state`].
#[derive(Debug)]
pub struct Orchestrator<'a> {
    config: &'a ConvertConfig,
    dispatcher: Dispatcher,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn state(&self) -> ConversionState {
        self.dispatcher.state()
    }

    /// Runs the conversion to `Complete`, or stops at the first fatal error.
    /// No container write happens after a fatal error.
    pub fn run<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<ConversionReport>
    where
        R: ContainerReader + ?Sized,
        W: ContainerWriter + ?Sized,
    {
        self.execute(input, output).map_err(|e| {
            self.dispatcher.fail();
            log::error!("Conversion failed: {}", e);
            e
        })
    }

    fn execute<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<ConversionReport>
    where
        R: ContainerReader + ?Sized,
        W: ContainerWriter + ?Sized,
    {
        log::debug!("input container holds {} entries", input.entry_names().len());

        // 1. Header: parse, then validate one state at a time.
        let header_bytes = input.read_required(HEADER_ENTRY)?;
        let doc = HeaderDocument::parse(header::decode_header_text(&header_bytes)?)?;
        let version = self.dispatcher.check_version(&doc)?;
        let kind = self.dispatcher.identify_driver(&doc)?;
        let ParsedHeader {
            mut descriptor,
            channels,
        } = header::describe(&doc, version, kind)?;

        log::info!(
            "Found {} probes/{} blocks of data",
            descriptor.probe_count,
            descriptor.block_count
        );
        let source_probes = descriptor.probe_count;

        // 2. Dispatch and run the data pipeline.
        let pipeline = self.dispatcher.select_pipeline(kind)?;
        output.write_entry(
            VERSION_ENTRY,
            self.config.output_format_version.to_string().as_bytes(),
        )?;

        let (meta, data_entries, warnings) = match (pipeline, &channels) {
            (PipelineKind::Logic, ChannelSet::Logic(logic_channels)) => {
                let written = logic::run(&descriptor, self.config.length_mismatch, input, output)?;
                (metadata::emit_logic(&descriptor, logic_channels), written, Vec::new())
            }
            (PipelineKind::Analog, ChannelSet::Analog(probes)) => {
                let outcome = analog::run(&mut descriptor, probes, input, output)?;
                (
                    metadata::emit_analog(&descriptor, probes)?,
                    outcome.entries_written,
                    outcome.warnings,
                )
            }
            (pipeline, _) => {
                return Err(ConvertError::InternalError(format!(
                    "{:?} pipeline selected for a {} channel set",
                    pipeline,
                    channels_kind(&channels)
                )))
            }
        };

        // 3. Metadata, always after the data.
        output.write_entry(METADATA_ENTRY, meta.to_text().as_bytes())?;
        self.dispatcher.metadata_emitted()?;
        self.dispatcher.complete()?;

        let report = ConversionReport {
            driver: kind,
            source_probes,
            output_probes: descriptor.probe_count,
            blocks: descriptor.block_count,
            data_entries,
            warnings,
        };
        if !report.is_clean() {
            log::warn!(
                "Conversion finished with {} skipped probe block(s)",
                report.warnings.len()
            );
        }
        log_metric!(
            "event"="conversion_complete",
            "entries"=report.data_entries,
            "warnings"=report.warnings.len()
        );
        if let Ok(json) = serde_json::to_string(&report) {
            log::debug!("report: {}", json);
        }
        Ok(report)
    }
}

fn channels_kind(channels: &ChannelSet) -> &'static str {
    match channels {
        ChannelSet::Logic(_) => "logic",
        ChannelSet::Analog(_) => "analog",
    }
}
