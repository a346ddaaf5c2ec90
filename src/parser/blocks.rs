use std::fmt;

use super::error::RecordError;
use super::lines::{Line, Numbered};

pub const MAX_SOURCE_LINKS: usize = 3;

/// Raw fields of one record block, before any coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBlock {
    pub line_no: usize,
    pub number: String,
    pub title: String,
    pub author: String,
    pub author_link: Option<String>,
    pub source_links: Vec<String>,
    pub image_src: String,
    pub image_alt: String,
    pub prompt: String,
}

/// A heading that did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    pub line_no: usize,
    pub number: String,
    pub error: RecordError,
}

/// What the segmenter is waiting for after a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LinksOrImage,
    PromptLabel,
    Fence,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::LinksOrImage => "source link or image tag",
            Stage::PromptLabel => "prompt label",
            Stage::Fence => "fenced prompt block",
        })
    }
}

struct Partial {
    block: RecordBlock,
    stage: Stage,
}

impl Partial {
    fn skip(self, error: RecordError) -> SkippedBlock {
        SkippedBlock {
            line_no: self.block.line_no,
            number: self.block.number,
            error,
        }
    }
}

/// Walk classified lines and cut them into record blocks:
/// heading → up to three source links → image tag → prompt label → fence.
/// Blank lines are allowed between any two steps. A line that breaks the
/// sequence abandons the current block and is looked at again, so a heading
/// that interrupts a broken block still opens a new one.
pub fn segment(lines: &[Numbered]) -> Vec<Result<RecordBlock, SkippedBlock>> {
    let mut out = Vec::new();
    let mut current: Option<Partial> = None;
    let mut i = 0;

    while i < lines.len() {
        let Numbered { line_no, line } = &lines[i];

        let Some(mut partial) = current.take() else {
            if let Line::Heading {
                number,
                title,
                author,
                author_link,
            } = line
            {
                current = Some(Partial {
                    block: RecordBlock {
                        line_no: *line_no,
                        number: number.clone(),
                        title: title.clone(),
                        author: author.clone(),
                        author_link: author_link.clone(),
                        source_links: Vec::new(),
                        image_src: String::new(),
                        image_alt: String::new(),
                        prompt: String::new(),
                    },
                    stage: Stage::LinksOrImage,
                });
            }
            i += 1;
            continue;
        };

        match (partial.stage, line) {
            (_, Line::Empty) => {}
            (Stage::LinksOrImage, Line::SourceLink(url)) => {
                if partial.block.source_links.len() == MAX_SOURCE_LINKS {
                    out.push(Err(partial.skip(RecordError::TooManySourceLinks)));
                    i += 1;
                    continue;
                }
                partial.block.source_links.push(url.clone());
            }
            (Stage::LinksOrImage, Line::Image { src, alt }) => {
                partial.block.image_src = src.clone();
                partial.block.image_alt = alt.clone();
                partial.stage = Stage::PromptLabel;
            }
            (Stage::PromptLabel, Line::PromptLabel) => partial.stage = Stage::Fence,
            (Stage::Fence, Line::Fence(inner)) => {
                partial.block.prompt = inner.clone();
                out.push(Ok(partial.block));
                i += 1;
                continue;
            }
            (stage, other) => {
                tracing::debug!(
                    line = *line_no,
                    found = other.kind(),
                    "abandoning block started at line {}",
                    partial.block.line_no
                );
                out.push(Err(partial.skip(RecordError::UnexpectedLine {
                    expected: stage,
                    line_no: *line_no,
                    found: other.kind(),
                })));
                // Re-examine this line with no block open
                continue;
            }
        }

        current = Some(partial);
        i += 1;
    }

    if let Some(partial) = current {
        let expected = partial.stage;
        out.push(Err(partial.skip(RecordError::Truncated { expected })));
    }

    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::Variant;
    use crate::parser::lines::classify_lines;

    fn run(md: &str) -> Vec<Result<RecordBlock, SkippedBlock>> {
        segment(&classify_lines(md, Variant::En.grammar()))
    }

    const ONE: &str = "\
## Example 1: Cat (by [@alice](https://x.com/alice))

[Source Link](https://example.com/a)

<img src=\"img/1.png\" width=\"300\" alt=\"a cat\">

**Prompt:**

```
draw a cat
```
";

    #[test]
    fn single_block() {
        let blocks = run(ONE);
        assert_eq!(blocks.len(), 1);
        let b = blocks[0].as_ref().unwrap();
        assert_eq!(b.line_no, 1);
        assert_eq!(b.number, "1");
        assert_eq!(b.source_links, vec!["https://example.com/a"]);
        assert_eq!(b.image_src, "img/1.png");
        assert_eq!(b.image_alt, "a cat");
        assert_eq!(b.prompt, "\ndraw a cat\n");
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let md = format!("# Title\n\nSome intro.\n\n{ONE}\n---\n\nOutro text.\n");
        let blocks = run(&md);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_ok());
    }

    #[test]
    fn three_links_in_order() {
        let md = "## Example 4: X (by [a])\n[Source Link](u1)\n[Source Link 2](u2)\n[Source Link 3](u3)\n<img src=\"p\" width=\"1\" alt=\"\">\n**Prompt:**\n```\nx\n```";
        let b = run(md).remove(0).unwrap();
        assert_eq!(b.source_links, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn fourth_link_abandons_block() {
        let md = "## Example 4: X (by [a])\n[Source Link](u1)\n[Source Link](u2)\n[Source Link](u3)\n[Source Link](u4)\n<img src=\"p\" width=\"1\" alt=\"\">\n**Prompt:**\n```\nx\n```";
        let blocks = run(md);
        assert_eq!(blocks.len(), 1);
        let skipped = blocks[0].as_ref().unwrap_err();
        assert_eq!(skipped.error, RecordError::TooManySourceLinks);
    }

    #[test]
    fn missing_image_is_reported() {
        let md = "## Example 2: Dog (by [bob])\nsome prose\n**Prompt:**\n```\nx\n```";
        let blocks = run(md);
        let skipped = blocks[0].as_ref().unwrap_err();
        assert_eq!(skipped.number, "2");
        assert_eq!(
            skipped.error,
            RecordError::UnexpectedLine {
                expected: Stage::LinksOrImage,
                line_no: 2,
                found: "text",
            }
        );
    }

    #[test]
    fn interrupting_heading_starts_new_block() {
        let md = format!("## Example 9: Broken (by [x])\n<img src=\"p\" width=\"1\" alt=\"\">\n{ONE}");
        let blocks = run(&md);
        assert_eq!(blocks.len(), 2);
        assert!(matches!(
            &blocks[0],
            Err(SkippedBlock { number, error: RecordError::UnexpectedLine { expected: Stage::PromptLabel, .. }, .. }) if number == "9"
        ));
        assert_eq!(blocks[1].as_ref().unwrap().number, "1");
    }

    #[test]
    fn truncated_at_end_of_document() {
        let blocks = run("## Example 3: Bird (by [c])\n<img src=\"p\" width=\"1\" alt=\"\">\n**Prompt:**\n");
        assert_eq!(
            blocks[0].as_ref().unwrap_err().error,
            RecordError::Truncated { expected: Stage::Fence }
        );
    }

    #[test]
    fn no_headings_no_blocks() {
        assert!(run("just a paragraph\n\n```\ncode\n```").is_empty());
    }
}
