mod config;
mod content_processing;
mod error;
mod fs_tools;
mod processing;

pub use config::{Config, DEFAULT_INPUT, DEFAULT_OUTPUT};
pub use content_processing::{Phase, Pipeline, State, Summary};
pub use error::{Endpoint, Error, Result, TransformError};
pub use fs_tools::{Finish, ReaderSource, Sink, Source, WriterSink, CHUNK_SIZE};
pub use processing::{CaseToggleProcessor, ChunkProcessor, LogLevelProcessor, ProcessorKind};

/// Converts `config.input` into `config.output` with the configured processor.
///
/// The input is opened before the output is created, so a missing input
/// leaves the destination untouched.
pub fn run(config: &Config) -> Result<Summary> {
    let processor = config.processor.build()?;
    let source = ReaderSource::open(&config.input)?;
    let sink = WriterSink::create(&config.output)?;

    log::info!(
        "converting {} -> {} with '{}' processor",
        config.input.display(),
        config.output.display(),
        config.processor.name()
    );
    let summary = Pipeline::new(source, sink, processor.as_ref()).run()?;
    log::info!(
        "processed {} chunks, {} bytes in, {} bytes out",
        summary.chunks,
        summary.bytes_read,
        summary.bytes_written
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_in(dir: &tempfile::TempDir, processor: ProcessorKind) -> Config {
        Config {
            input: dir.path().join("input.txt"),
            output: dir.path().join("output.txt"),
            processor,
        }
    }

    #[test]
    fn toggles_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, ProcessorKind::Case);
        fs::write(&config.input, "abc DEF").unwrap();

        let summary = run(&config).unwrap();

        assert_eq!(fs::read_to_string(&config.output).unwrap(), "ABC def");
        assert_eq!(summary.bytes_written, 7);
    }

    #[test]
    fn expands_log_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, ProcessorKind::Log);
        fs::write(&config.input, "2024 I started\n2024 E failed\n").unwrap();

        run(&config).unwrap();

        assert_eq!(
            fs::read_to_string(&config.output).unwrap(),
            "2024 INFO started\n2024 ERROR failed\n"
        );
    }

    #[test]
    fn spans_many_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, ProcessorKind::Case);
        let text = "The Quick Brown Fox\n".repeat(500);
        fs::write(&config.input, &text).unwrap();

        let summary = run(&config).unwrap();

        assert_eq!(summary.chunks, (text.len() + CHUNK_SIZE - 1) / CHUNK_SIZE);
        assert_eq!(
            fs::read_to_string(&config.output).unwrap(),
            "tHE qUICK bROWN fOX\n".repeat(500)
        );
    }

    #[test]
    fn missing_input_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, ProcessorKind::Case);

        let err = run(&config).unwrap_err();

        assert!(matches!(err, Error::OpenInput { .. }));
        assert!(!config.output.exists());
    }
}
