//! Structure-aware pre-tokenizer (spec §4.1, component C1).
//!
//! Splits raw text into physical lines, classifies each by structural role
//! in priority order (fenced code → table → heading → list → blank →
//! plain), then segments plain/list regions into sentences on terminal
//! punctuation. Blank lines are consumed as a `paragraph_break` hint on the
//! next emitted sentence rather than emitted themselves.
//!
//! Line classification here mirrors the scoring/heuristic shape of
//! `zen-parser`'s `extractors/text/helpers.rs` (per-line, no parser
//! grammar) rather than that crate's ast-grep-driven Markdown/RST splitting
//! in `doc_chunker.rs` — this spec's structure rules are simple
//! leading-character tests, not a CommonMark grammar.

use crate::config::DocumentStructureConfig;
use crate::model::{StructureType, StructuredSentence};

/// Terminal punctuation that ends a sentence in plain/list regions.
const TERMINATORS: &[char] = &['。', '．', '！', '？', '!', '?', '.'];

/// Closing quote/bracket characters absorbed immediately after a terminator.
const TRAILING_CLOSERS: &[char] = &['」', '』', '）', ')', '"', '\'', '”', '’'];

/// Run the pre-processor over `content`, returning the ordered, non-blank
/// sentence stream. Not lazy in this implementation (the whole document is
/// held as lines in memory, matching spec's "nothing materializes the
/// entire document except where a bounded window is required" allowance —
/// a single source document's lines are not the bounded resource the spec
/// worries about; that's the embedder/detector windows downstream).
#[must_use]
pub fn preprocess(content: &str, config: &DocumentStructureConfig) -> Vec<StructuredSentence> {
    let lines: Vec<&str> = content.lines().collect();
    let classified = classify_lines(&lines, config);

    let mut out = Vec::new();
    let mut pending_paragraph_break = false;

    let mut i = 0usize;
    while i < classified.len() {
        let (structure_type, indent, raw) = &classified[i];

        match structure_type {
            StructureType::Blank => {
                pending_paragraph_break = true;
                i += 1;
            }
            StructureType::Code | StructureType::Table => {
                push_sentence(
                    &mut out,
                    raw.trim().to_string(),
                    line_no(i),
                    *structure_type,
                    *indent,
                    structure_info_for(*structure_type, raw),
                    &mut pending_paragraph_break,
                );
                i += 1;
            }
            StructureType::Header => {
                let level = header_level(raw, config).unwrap_or(1);
                push_sentence(
                    &mut out,
                    header_text(raw).to_string(),
                    line_no(i),
                    StructureType::Header,
                    *indent,
                    format!("header:{level}"),
                    &mut pending_paragraph_break,
                );
                i += 1;
            }
            StructureType::List => {
                let ordered = is_ordered_marker(raw);
                let tag = if ordered {
                    "list:ordered"
                } else {
                    "list:unordered"
                };
                let body = list_item_text(raw);
                for sentence_text in segment_sentences(body) {
                    push_sentence(
                        &mut out,
                        sentence_text,
                        line_no(i),
                        StructureType::List,
                        *indent,
                        tag.to_string(),
                        &mut pending_paragraph_break,
                    );
                }
                i += 1;
            }
            StructureType::Plain => {
                // Merge the contiguous run of Plain lines into one paragraph,
                // tracking which physical line each byte offset came from so
                // sentences can be attributed their true starting line.
                let start = i;
                let mut joined = String::new();
                let mut offsets: Vec<(usize, u32)> = Vec::new(); // (byte_offset_in_joined, line_no)
                while i < classified.len() && classified[i].0 == StructureType::Plain {
                    offsets.push((joined.len(), line_no(i)));
                    if !joined.is_empty() {
                        joined.push(' ');
                    }
                    joined.push_str(classified[i].2.trim());
                    i += 1;
                }
                let base_indent = classified[start].1;
                for (byte_off, sentence_text) in segment_sentences_with_offsets(&joined) {
                    let ln = offsets
                        .iter()
                        .rev()
                        .find(|(off, _)| *off <= byte_off)
                        .map_or(line_no(start), |(_, ln)| *ln);
                    push_sentence(
                        &mut out,
                        sentence_text,
                        ln,
                        StructureType::Plain,
                        base_indent,
                        String::new(),
                        &mut pending_paragraph_break,
                    );
                }
            }
        }
    }

    out
}

fn line_no(zero_based_index: usize) -> u32 {
    u32::try_from(zero_based_index + 1).unwrap_or(u32::MAX)
}

#[allow(clippy::too_many_arguments)]
fn push_sentence(
    out: &mut Vec<StructuredSentence>,
    text: String,
    line_number: u32,
    structure_type: StructureType,
    indent_level: u32,
    mut structure_info: String,
    pending_paragraph_break: &mut bool,
) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    if *pending_paragraph_break {
        if structure_info.is_empty() {
            structure_info.push_str("paragraph_break");
        } else {
            structure_info.push(',');
            structure_info.push_str("paragraph_break");
        }
        *pending_paragraph_break = false;
    }
    out.push(StructuredSentence {
        text: trimmed.to_string(),
        line_number,
        structure_type,
        indent_level,
        structure_info,
    });
}

fn structure_info_for(structure_type: StructureType, raw: &str) -> String {
    match structure_type {
        StructureType::Table => {
            let cols = raw.split('|').filter(|c| !c.trim().is_empty()).count();
            format!("table:{cols}")
        }
        StructureType::Code => String::from("code"),
        _ => String::new(),
    }
}

// ── Line classification ──────────────────────────────────────────────

/// Classify every physical line, returning `(structure_type, indent_level,
/// raw_line)` triples in source order. Applies spec §4.1's priority order:
/// fenced code → table → heading → list → blank → plain.
fn classify_lines<'a>(
    lines: &[&'a str],
    config: &DocumentStructureConfig,
) -> Vec<(StructureType, u32, &'a str)> {
    let mut out = Vec::with_capacity(lines.len());
    let mut in_code_fence = false;
    let mut fence_marker: Option<&str> = None;

    for line in lines {
        let trimmed = line.trim_start();
        let indent = indent_level(line, config);

        if let Some(marker) = fence_marker {
            out.push((StructureType::Code, indent, *line));
            if trimmed.starts_with(marker) {
                in_code_fence = false;
                fence_marker = None;
            }
            continue;
        }

        if !in_code_fence && (trimmed.starts_with("```") || trimmed.starts_with("~~~")) {
            in_code_fence = true;
            fence_marker = Some(if trimmed.starts_with("```") { "```" } else { "~~~" });
            out.push((StructureType::Code, indent, *line));
            continue;
        }

        if config.detect_html && is_html_pre_open(trimmed) {
            in_code_fence = true;
            fence_marker = Some("</pre>");
            out.push((StructureType::Code, indent, *line));
            continue;
        }

        if is_table_row(trimmed) {
            out.push((StructureType::Table, indent, *line));
            continue;
        }

        if config.detect_markdown && is_markdown_heading(trimmed, config) {
            out.push((StructureType::Header, indent, *line));
            continue;
        }
        if config.detect_html && is_html_heading(trimmed, config) {
            out.push((StructureType::Header, indent, *line));
            continue;
        }

        if config.detect_markdown && is_markdown_list_item(trimmed) {
            out.push((StructureType::List, indent, *line));
            continue;
        }
        if config.detect_html && is_html_list_item(trimmed) {
            out.push((StructureType::List, indent, *line));
            continue;
        }

        if trimmed.is_empty() {
            out.push((StructureType::Blank, indent, *line));
            continue;
        }

        out.push((StructureType::Plain, indent, *line));
    }

    out
}

fn indent_level(line: &str, config: &DocumentStructureConfig) -> u32 {
    if !config.detect_indentation {
        return 0;
    }
    let spaces = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { config.tab_width.max(1) } else { 1 })
        .sum::<u32>();
    spaces / config.tab_width.max(1)
}

fn is_table_row(trimmed: &str) -> bool {
    if !trimmed.contains('|') {
        return false;
    }
    let cols = trimmed
        .trim_matches('|')
        .split('|')
        .filter(|c| !c.trim().is_empty())
        .count();
    cols >= 2
}

fn is_markdown_heading(trimmed: &str, config: &DocumentStructureConfig) -> bool {
    header_level_raw(trimmed).is_some_and(|level| {
        level >= config.min_header_level && level <= config.max_header_level
    })
}

fn header_level_raw(trimmed: &str) -> Option<u8> {
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if rest.starts_with(' ') {
        Some(u8::try_from(hashes).unwrap_or(6))
    } else {
        None
    }
}

fn is_html_heading(trimmed: &str, config: &DocumentStructureConfig) -> bool {
    for level in config.min_header_level..=config.max_header_level {
        if trimmed
            .to_ascii_lowercase()
            .starts_with(&format!("<h{level}>"))
        {
            return true;
        }
    }
    false
}

fn is_html_pre_open(trimmed: &str) -> bool {
    trimmed.to_ascii_lowercase().starts_with("<pre>")
}

fn is_html_list_item(trimmed: &str) -> bool {
    trimmed.to_ascii_lowercase().starts_with("<li>")
}

fn is_markdown_list_item(trimmed: &str) -> bool {
    is_ordered_marker(trimmed) || is_unordered_marker(trimmed)
}

fn is_unordered_marker(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    matches!(chars.next(), Some('-' | '*' | '+')) && chars.next() == Some(' ')
}

fn is_ordered_marker(trimmed: &str) -> bool {
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return false;
    }
    let rest = &trimmed[digits.len()..];
    rest.starts_with(". ")
}

fn header_level(raw: &str, config: &DocumentStructureConfig) -> Option<u8> {
    let trimmed = raw.trim_start();
    header_level_raw(trimmed).or_else(|| {
        if config.detect_html {
            for level in config.min_header_level..=config.max_header_level {
                if trimmed
                    .to_ascii_lowercase()
                    .starts_with(&format!("<h{level}>"))
                {
                    return Some(level);
                }
            }
        }
        None
    })
}

fn header_text(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix('#') {
        return rest.trim_start_matches('#').trim().trim_end_matches('#').trim();
    }
    // HTML-style: strip a leading `<hN>` and trailing `</hN>` if present.
    if let Some(gt) = trimmed.find('>') {
        let inner = &trimmed[gt + 1..];
        if let Some(lt) = inner.rfind("</") {
            return inner[..lt].trim();
        }
        return inner.trim();
    }
    trimmed
}

fn list_item_text(raw: &str) -> &str {
    let trimmed = raw.trim();
    if is_unordered_marker(trimmed) {
        return trimmed[1..].trim_start();
    }
    if is_ordered_marker(trimmed) {
        let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
        return trimmed[digits.len() + 1..].trim_start();
    }
    if trimmed.to_ascii_lowercase().starts_with("<li>") {
        if let Some(gt) = trimmed.find('>') {
            let inner = &trimmed[gt + 1..];
            let end = inner.to_ascii_lowercase().find("</li>").unwrap_or(inner.len());
            return inner[..end].trim();
        }
    }
    trimmed
}

// ── Sentence segmentation ────────────────────────────────────────────

/// Split `text` into sentences on terminal punctuation, respecting bracket/
/// quote nesting (spec §4.1 step 4). Used for list items, where byte
/// offsets into the original line are not needed by the caller.
fn segment_sentences(text: &str) -> Vec<String> {
    segment_sentences_with_offsets(text)
        .into_iter()
        .map(|(_, s)| s)
        .collect()
}

/// Same as [`segment_sentences`] but also returns each sentence's starting
/// byte offset in `text`, used by the plain-paragraph path to attribute a
/// sentence back to its source line.
fn segment_sentences_with_offsets(text: &str) -> Vec<(usize, String)> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = Vec::new();
    let mut seg_start_idx = 0usize; // index into `chars`
    let mut bracket_stack: Vec<char> = Vec::new();
    let mut in_straight_quote = false;

    let mut i = 0usize;
    while i < chars.len() {
        let (_, c) = chars[i];

        match c {
            '(' | '（' | '[' | '「' | '『' | '“' | '‘' => bracket_stack.push(c),
            ')' | '）' | ']' | '」' | '』' | '”' | '’' => {
                bracket_stack.pop();
            }
            '"' | '\'' => in_straight_quote = !in_straight_quote,
            _ => {}
        }

        if bracket_stack.is_empty() && !in_straight_quote && TERMINATORS.contains(&c) {
            let mut end = i + 1;
            while end < chars.len() && TRAILING_CLOSERS.contains(&chars[end].1) {
                end += 1;
            }
            let start_byte = chars[seg_start_idx].0;
            let end_byte = if end < chars.len() {
                chars[end].0
            } else {
                text.len()
            };
            let sentence = text[start_byte..end_byte].trim();
            if !sentence.is_empty() {
                out.push((start_byte, sentence.to_string()));
            }
            seg_start_idx = end;
            i = end;
            continue;
        }

        i += 1;
    }

    if seg_start_idx < chars.len() {
        let start_byte = chars[seg_start_idx].0;
        let remainder = text[start_byte..].trim();
        if !remainder.is_empty() {
            out.push((start_byte, remainder.to_string()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg() -> DocumentStructureConfig {
        DocumentStructureConfig::default()
    }

    #[test]
    fn heading_then_body_forces_two_sentences() {
        let sentences = preprocess("# Intro\nThis is the body.", &cfg());
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].structure_type, StructureType::Header);
        assert_eq!(sentences[0].text, "Intro");
        assert_eq!(sentences[1].structure_type, StructureType::Plain);
        assert_eq!(sentences[1].text, "This is the body.");
    }

    #[test]
    fn list_cohesion_four_sentences() {
        let sentences = preprocess("- A\n- B\n- C\nNext paragraph.", &cfg());
        assert_eq!(sentences.len(), 4);
        for s in &sentences[..3] {
            assert_eq!(s.structure_type, StructureType::List);
        }
        assert_eq!(sentences[3].structure_type, StructureType::Plain);
        assert_eq!(sentences[3].text, "Next paragraph.");
    }

    #[test]
    fn blank_lines_are_never_emitted() {
        let sentences = preprocess("Para one.\n\n\nPara two.", &cfg());
        assert!(sentences.iter().all(|s| s.structure_type != StructureType::Blank));
        assert_eq!(sentences.len(), 2);
        assert!(sentences[1].has_paragraph_break_hint());
    }

    #[test]
    fn japanese_terminators_split_sentences() {
        let sentences = preprocess("これは文です。これも文です。", &cfg());
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "これは文です。");
        assert_eq!(sentences[1].text, "これも文です。");
    }

    #[test]
    fn does_not_split_inside_parentheses() {
        let sentences = preprocess("This is fine (see note. really.) after.", &cfg());
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn fenced_code_lines_are_not_split() {
        let sentences = preprocess("```\nfn main() {}\nlet x = 1.5;\n```", &cfg());
        assert!(sentences.iter().all(|s| s.structure_type == StructureType::Code));
        // One sentence per physical line, including the fence markers.
        assert_eq!(sentences.len(), 4);
    }

    #[test]
    fn table_rows_are_not_split() {
        let sentences = preprocess("| a | b |\n| 1.5 | 2.5 |", &cfg());
        assert_eq!(sentences.len(), 2);
        assert!(sentences.iter().all(|s| s.structure_type == StructureType::Table));
    }

    #[test]
    fn ordered_list_marker_detected() {
        let sentences = preprocess("1. First\n2. Second", &cfg());
        assert!(sentences.iter().all(StructuredSentence::is_ordered_list));
    }

    #[test]
    fn line_numbers_non_decreasing() {
        let sentences = preprocess(
            "# Title\n\nFirst sentence. Second sentence.\n\n- item one\n- item two",
            &cfg(),
        );
        let mut prev = 0;
        for s in &sentences {
            assert!(s.line_number >= prev);
            prev = s.line_number;
        }
    }

    #[test]
    fn min_header_level_clips_recognized_range() {
        let mut config = cfg();
        config.min_header_level = 2;
        let sentences = preprocess("# Top\n## Sub", &config);
        // "# Top" falls below min_header_level, so it is treated as plain text.
        assert_eq!(sentences[0].structure_type, StructureType::Plain);
        assert_eq!(sentences[1].structure_type, StructureType::Header);
    }
}
