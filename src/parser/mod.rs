pub mod blocks;
pub mod error;
pub mod grammar;
pub mod lines;

use std::collections::HashSet;

use tracing::warn;

use crate::record::ExampleRecord;
use blocks::{RecordBlock, SkippedBlock};
use error::RecordError;
use grammar::Variant;

/// Result of one extraction run.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Sorted ascending by case number.
    pub records: Vec<ExampleRecord>,
    pub skipped: Vec<SkippedBlock>,
}

/// Three-pass pipeline: markdown → classified lines → record blocks → records.
pub fn extract(markdown: &str, variant: Variant) -> Extraction {
    let lines = lines::classify_lines(markdown, variant.grammar());
    let mut extraction = Extraction::default();

    for block in blocks::segment(&lines) {
        match block.and_then(assemble) {
            Ok(record) => extraction.records.push(record),
            Err(skipped) => {
                warn!(
                    line = skipped.line_no,
                    case = %skipped.number,
                    "skipping example: {}",
                    skipped.error
                );
                extraction.skipped.push(skipped);
            }
        }
    }

    // Stable: duplicates keep document order
    extraction.records.sort_by_key(|r| r.case_number);
    warn_duplicates(&extraction.records);
    extraction
}

fn assemble(block: RecordBlock) -> Result<ExampleRecord, SkippedBlock> {
    let digits_only = block.number.bytes().all(|b| b.is_ascii_digit());
    let case_number = match block.number.parse::<u32>() {
        Ok(n) if digits_only && n >= 1 => n,
        _ => {
            return Err(SkippedBlock {
                line_no: block.line_no,
                error: RecordError::InvalidCaseNumber(block.number.clone()),
                number: block.number,
            })
        }
    };

    Ok(ExampleRecord {
        case_number,
        title: block.title,
        author: block.author,
        author_link: block.author_link.unwrap_or_default(),
        original_links: block.source_links,
        image_path: block.image_src,
        image_alt: block.image_alt,
        prompt: block.prompt.trim().to_string(),
    })
}

fn warn_duplicates(records: &[ExampleRecord]) {
    let mut seen = HashSet::new();
    for r in records {
        if !seen.insert(r.case_number) {
            warn!(case = r.case_number, title = %r.title, "duplicate case number");
        }
    }
}

// ── Tests ──
