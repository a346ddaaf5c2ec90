use super::grammar::{Grammar, IMAGE_RE};

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading {
        number: String,
        title: String,
        author: String,
        author_link: Option<String>,
    },
    SourceLink(String),
    Image { src: String, alt: String },
    PromptLabel,
    /// Inner text of a fenced block, untrimmed.
    Fence(String),
    Text(String),
    Empty,
}

impl Line {
    pub fn kind(&self) -> &'static str {
        match self {
            Line::Heading { .. } => "heading",
            Line::SourceLink(_) => "source link",
            Line::Image { .. } => "image tag",
            Line::PromptLabel => "prompt label",
            Line::Fence(_) => "fenced block",
            Line::Text(_) => "text",
            Line::Empty => "empty line",
        }
    }
}

/// A classified line with its 1-based line number in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbered {
    pub line_no: usize,
    pub line: Line,
}

/// Classify every line of `markdown` under `grammar`. A fenced block is
/// consumed up to its closing backticks and yields a single `Line::Fence`.
pub fn classify_lines(markdown: &str, grammar: &Grammar) -> Vec<Numbered> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let line = raw.trim();
        let line_no = i + 1;

        if line.is_empty() {
            out.push(Numbered { line_no, line: Line::Empty });
            i += 1;
            continue;
        }

        // ── Fenced block: ``` ... ``` ──
        if let Some(rest) = line.strip_prefix(FENCE) {
            match consume_fence(rest, &lines, i + 1) {
                Some((inner, next)) => {
                    out.push(Numbered { line_no, line: Line::Fence(inner) });
                    i = next;
                }
                None => {
                    // Never closed: leave the rest of the document as text
                    out.push(Numbered { line_no, line: Line::Text(line.to_string()) });
                    i += 1;
                }
            }
            continue;
        }

        // ── Heading: ## Example N: title (by [author](link)) ──
        if let Some(caps) = grammar.heading.captures(line) {
            out.push(Numbered {
                line_no,
                line: Line::Heading {
                    number: caps["num"].to_string(),
                    title: caps["title"].to_string(),
                    author: caps["author"].to_string(),
                    author_link: caps.name("link").map(|m| m.as_str().to_string()),
                },
            });
            i += 1;
            continue;
        }

        if let Some(caps) = grammar.source_link.captures(line) {
            out.push(Numbered { line_no, line: Line::SourceLink(caps["url"].to_string()) });
            i += 1;
            continue;
        }

        if let Some(caps) = IMAGE_RE.captures(line) {
            out.push(Numbered {
                line_no,
                line: Line::Image {
                    src: caps["src"].to_string(),
                    alt: caps["alt"].to_string(),
                },
            });
            i += 1;
            continue;
        }

        if grammar.prompt_label.is_match(line) {
            out.push(Numbered { line_no, line: Line::PromptLabel });
            i += 1;
            continue;
        }

        out.push(Numbered { line_no, line: Line::Text(line.to_string()) });
        i += 1;
    }

    out
}

/// Collect the inner text of a fence whose opener line continues with
/// `opener_rest`. Returns the inner text and the index of the line after
/// the closing backticks, or `None` if the fence is never closed.
fn consume_fence(opener_rest: &str, lines: &[&str], start: usize) -> Option<(String, usize)> {
    // Closed on the opener line itself: ```text```
    if let Some(end) = opener_rest.find(FENCE) {
        return Some((opener_rest[..end].to_string(), start));
    }

    let mut parts = vec![opener_rest];
    for (j, raw) in lines.iter().copied().enumerate().skip(start) {
        if let Some(end) = raw.find(FENCE) {
            parts.push(&raw[..end]);
            return Some((parts.join("\n"), j + 1));
        }
        parts.push(raw);
    }
    None
}
