//! Persists finished chunks as JSONL (component C8).

use std::path::Path;

use anyhow::{Context, Result};
use kw_core::Chunk;
use serde::Serialize;
use serde_jsonlines::write_json_lines;

/// On-disk shape of a single JSONL record. Kept distinct from [`Chunk`] so
/// the wire format doesn't shift every time the in-memory model grows a
/// field the writer has no use for.
#[derive(Debug, Serialize)]
struct ChunkRecord<'a> {
    text: &'a str,
    char_count: usize,
    token_count: usize,
    heading_levels: &'a [u8],
    spans_list: bool,
    line_range: (u32, u32),
}

impl<'a> From<&'a Chunk> for ChunkRecord<'a> {
    fn from(chunk: &'a Chunk) -> Self {
        Self {
            text: &chunk.text,
            char_count: chunk.char_count,
            token_count: chunk.token_count,
            heading_levels: &chunk.metadata.heading_levels,
            spans_list: chunk.metadata.spans_list,
            line_range: chunk.metadata.line_range,
        }
    }
}

/// Write `chunks` to `output` as one JSON object per line.
pub fn write_chunks(output: &Path, chunks: &[Chunk]) -> Result<()> {
    let records: Vec<ChunkRecord<'_>> = chunks.iter().map(ChunkRecord::from).collect();
    write_json_lines(output, &records)
        .with_context(|| format!("failed to write chunks to '{}'", output.display()))
}
