use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Authoring convention of the README being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Chinese README (`## 案例 1：...`)
    Cn,
    /// English README (`## Example 1: ...`)
    En,
}

impl Variant {
    pub fn grammar(self) -> &'static Grammar {
        match self {
            Variant::Cn => &CN,
            Variant::En => &EN,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Cn => f.write_str("cn"),
            Variant::En => f.write_str("en"),
        }
    }
}

/// Line patterns for one authoring convention. Every pattern is matched
/// against a single trimmed line.
pub struct Grammar {
    /// Captures `num`, `title`, `author` and optionally `link`.
    pub heading: Regex,
    /// Captures `url`.
    pub source_link: Regex,
    pub prompt_label: Regex,
}

/// Shared by both conventions: captures `src` and `alt`.
pub static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<img src="(?P<src>.*?)"(?: width="\d+")? alt="(?P<alt>.*?)">$"#).unwrap()
});

static EN: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    heading: Regex::new(
        r"^## Example (?P<num>\S+?): (?P<title>.*?) \(by \[@?(?P<author>[^()]+)\](?:\((?P<link>[^()]+)\))?\)$",
    )
    .unwrap(),
    source_link: Regex::new(r"^\[Source Link(?:\s*\d*)\]\((?P<url>[^)]+)\)$").unwrap(),
    prompt_label: Regex::new(r"^\*\*Prompt(?:\s+Template)?:?\*\*$").unwrap(),
});

static CN: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    heading: Regex::new(
        r"^## 案例 (?P<num>\S+?)：(?P<title>.*?)（作者：\[@?(?P<author>[^()]+)\](?:\((?P<link>[^()]+)\))?）$",
    )
    .unwrap(),
    source_link: Regex::new(r"^\[原文链接(?:\s*\d*)\]\((?P<url>[^)]+)\)$").unwrap(),
    prompt_label: Regex::new(r"^\*\*提示词(?:\s+模板)?：\*\*$").unwrap(),
});
