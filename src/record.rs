use serde::{Deserialize, Serialize};

/// One example entry of the README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRecord {
    pub case_number: u32,
    pub title: String,
    pub author: String,
    /// Empty when the heading has no profile link.
    pub author_link: String,
    /// Source links in document order, at most three.
    pub original_links: Vec<String>,
    pub image_path: String,
    pub image_alt: String,
    pub prompt: String,
}

/// How `original_link` is written to JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkShape {
    /// `""` for no link, a string for one, an array for two or more.
    #[default]
    Legacy,
    /// Always an array.
    List,
}

#[derive(Serialize)]
#[serde(untagged)]
enum OriginalLink<'a> {
    One(&'a str),
    Many(&'a [String]),
}

/// Borrowed JSON view of a record; field order is the output key order.
#[derive(Serialize)]
pub struct RecordJson<'a> {
    case_number: u32,
    title: &'a str,
    author: &'a str,
    author_link: &'a str,
    original_link: OriginalLink<'a>,
    image_path: &'a str,
    image_alt: &'a str,
    prompt: &'a str,
}

impl ExampleRecord {
    pub fn to_json(&self, shape: LinkShape) -> RecordJson<'_> {
        let links = self.original_links.as_slice();
        let original_link = match (shape, links) {
            (LinkShape::List, _) => OriginalLink::Many(links),
            (LinkShape::Legacy, []) => OriginalLink::One(""),
            (LinkShape::Legacy, [one]) => OriginalLink::One(one),
            (LinkShape::Legacy, _) => OriginalLink::Many(links),
        };
        RecordJson {
            case_number: self.case_number,
            title: &self.title,
            author: &self.author,
            author_link: &self.author_link,
            original_link,
            image_path: &self.image_path,
            image_alt: &self.image_alt,
            prompt: &self.prompt,
        }
    }
}
