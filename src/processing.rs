use std::{borrow::Cow, str::FromStr};

use regex::bytes::Regex;

use crate::error::{Error, TransformError};

/// A stateless byte transformation applied to each chunk independently.
pub trait ChunkProcessor {
    fn process<'a>(&self, chunk: &'a [u8]) -> Result<Cow<'a, [u8]>, TransformError>;
}

/// Swaps the case of ASCII letters. Bytes of multi-byte encodings are not
/// letters here and pass through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseToggleProcessor;

impl CaseToggleProcessor {
    pub fn new() -> Self {
        CaseToggleProcessor
    }
}

impl ChunkProcessor for CaseToggleProcessor {
    fn process<'a>(&self, chunk: &'a [u8]) -> Result<Cow<'a, [u8]>, TransformError> {
        let toggled = chunk
            .iter()
            .map(|&b| match b {
                b'a'..=b'z' => b - 32,
                b'A'..=b'Z' => b + 32,
                _ => b,
            })
            .collect::<Vec<u8>>();
        Ok(Cow::Owned(toggled))
    }
}

/// Expands single-letter log levels surrounded by spaces (` I `, ` D `,
/// ` E `, ` W `) into their full names.
///
/// Every chunk is scanned on its own, so a token split across two chunks is
/// left as is.
#[derive(Debug, Clone)]
pub struct LogLevelProcessor {
    filter: Regex,
}

impl LogLevelProcessor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(LogLevelProcessor {
            filter: Regex::new(r" ([IDEW]) ")?,
        })
    }

    fn expand(level: u8) -> &'static [u8] {
        match level {
            b'I' => b" INFO ",
            b'D' => b" DEBUG ",
            b'E' => b" ERROR ",
            _ => b" WARN ",
        }
    }
}

impl ChunkProcessor for LogLevelProcessor {
    fn process<'a>(&self, chunk: &'a [u8]) -> Result<Cow<'a, [u8]>, TransformError> {
        let mut matches = self.filter.captures_iter(chunk).peekable();
        if matches.peek().is_none() {
            return Ok(Cow::Borrowed(chunk));
        }

        let mut result = Vec::with_capacity(chunk.len() + 16);
        let mut offset = 0usize;
        for captures in matches {
            let (Some(token), Some(level)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            result.extend_from_slice(&chunk[offset..token.start()]);
            result.extend_from_slice(Self::expand(level.as_bytes()[0]));
            offset = token.end();
        }
        result.extend_from_slice(&chunk[offset..]);
        Ok(Cow::Owned(result))
    }
}

/// Processor selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorKind {
    #[default]
    Case,
    Log,
}

impl ProcessorKind {
    pub fn build(self) -> Result<Box<dyn ChunkProcessor>, Error> {
        Ok(match self {
            ProcessorKind::Case => Box::new(CaseToggleProcessor::new()),
            ProcessorKind::Log => Box::new(LogLevelProcessor::new()?),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            ProcessorKind::Case => "case",
            ProcessorKind::Log => "log",
        }
    }
}

impl FromStr for ProcessorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "case" => Ok(ProcessorKind::Case),
            "log" => Ok(ProcessorKind::Log),
            other => Err(Error::UnknownProcessor(other.to_string())),
        }
    }
}
