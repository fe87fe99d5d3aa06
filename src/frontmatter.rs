//! Splits a post source file into its YAML front-matter [`Attributes`] and its
//! markdown body. Parsing sits behind the [`FrontmatterParser`] trait so the
//! post and index pipelines don't care which format the metadata is in;
//! [`YamlFrontmatter`] is the one implementation.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// The front-matter attributes recognized on a post. Every field is optional
/// at parse time; callers decide which ones they require via the accessor
/// methods, which return [`Error::MissingAttribute`] for absent values.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    #[serde(default)]
    title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_date")]
    date: Option<NaiveDateTime>,

    #[serde(default)]
    description: Option<String>,
}

impl Attributes {
    pub fn title(&self) -> Result<&str> {
        self.title
            .as_deref()
            .ok_or(Error::MissingAttribute("title"))
    }

    pub fn date(&self) -> Result<NaiveDateTime> {
        self.date.ok_or(Error::MissingAttribute("date"))
    }

    pub fn description(&self) -> Result<&str> {
        self.description
            .as_deref()
            .ok_or(Error::MissingAttribute("description"))
    }
}

/// A parsed source document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub attributes: Attributes,
    pub body: String,
}

/// Parses a document into metadata and body.
pub trait FrontmatterParser {
    fn parse(&self, text: &str) -> Result<Document>;
}

/// Parses `---`-fenced YAML front-matter. The file must begin with a line
/// holding only `---`, and the front-matter ends at the next line holding
/// only `---` or the YAML document end marker `...`. Everything after the
/// closing fence line is the body.
///
/// ```md
/// ---
/// title: Hello, world!
/// date: 2021-04-16
/// description: A greeting.
/// ---
/// # Hello
///
/// World
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlFrontmatter;

impl FrontmatterParser for YamlFrontmatter {
    fn parse(&self, text: &str) -> Result<Document> {
        let text = text.trim_start_matches('\u{feff}');
        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(text)?;
        let yaml = &text[yaml_start..yaml_stop];
        let attributes = if yaml.trim().is_empty() {
            Attributes::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        Ok(Document {
            attributes,
            body: text[body_start..].to_owned(),
        })
    }
}

// Returns (yaml_start, yaml_stop, body_start).
fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    const DOCUMENT_END: &str = "...";
    let first_line = input.split_inclusive('\n').next().unwrap_or("");
    if first_line.trim_end() != FENCE {
        return Err(Error::MissingStartFence);
    }

    let yaml_start = first_line.len();
    let mut offset = yaml_start;
    for line in input[yaml_start..].split_inclusive('\n') {
        let line_content = line.trim_end();
        if line_content == FENCE || line_content == DOCUMENT_END {
            return Ok((yaml_start, offset, offset + line.len()));
        }
        offset += line.len();
    }
    Err(Error::MissingEndFence)
}

/// Parses a front-matter date. Accepts `YYYY-MM-DD` (midnight),
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, and RFC 3339 timestamps with
/// an offset, which are normalized to UTC.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime);
        }
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|datetime| datetime.naive_utc())
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) => match parse_date(&s) {
            Some(date) => Ok(Some(date)),
            None => Err(D::Error::custom(format!("invalid date `{}`", s))),
        },
    }
}

/// The result of a front-matter operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading front-matter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a document doesn't begin with a `---` line.
    #[error("document must begin with `---`")]
    MissingStartFence,

    /// Returned when the opening fence was found but the closing one wasn't.
    #[error("missing closing `---`")]
    MissingEndFence,

    /// Returned when the front-matter isn't valid YAML, or a value has the
    /// wrong shape (including unparseable dates).
    #[error(transparent)]
    DeserializeYaml(#[from] serde_yaml::Error),

    /// Returned by the [`Attributes`] accessors for absent keys.
    #[error("missing required front-matter attribute `{0}`")]
    MissingAttribute(&'static str),
}
