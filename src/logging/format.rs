//! Template-driven event formatting.
//!
//! Templates use `{placeholder}` segments with an optional `:<N` or `:>N`
//! width, e.g. `"{name} {asctime} {levelname:<8} {message}"`. Literal braces
//! are written as `{{` and `}}`.

use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::fmt;
use std::path::Path;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Asctime,
    Levelname,
    Filename,
    Lineno,
    Target,
    Message,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "asctime" => Some(Self::Asctime),
            "levelname" => Some(Self::Levelname),
            "filename" => Some(Self::Filename),
            "lineno" => Some(Self::Lineno),
            "target" => Some(Self::Target),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left(usize),
    Right(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(Field, Option<Align>),
}

/// A parsed log line template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut spec = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        spec.push(inner);
                    }
                    if !closed {
                        return Err(Error::format(format!("unclosed placeholder in {source:?}")));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&spec)?);
                }
                '}' => {
                    return Err(Error::format(format!("unmatched '}}' in {source:?}")));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn parse_placeholder(spec: &str) -> Result<Segment> {
    let (name, width) = match spec.split_once(':') {
        Some((name, width)) => (name.trim(), Some(width.trim())),
        None => (spec.trim(), None),
    };

    let field = Field::parse(name)
        .ok_or_else(|| Error::format(format!("unknown placeholder '{name}'")))?;

    let align = match width {
        None => None,
        Some(w) => {
            let (right, digits) = match (w.strip_prefix('<'), w.strip_prefix('>')) {
                (Some(d), _) => (false, d),
                (None, Some(d)) => (true, d),
                (None, None) => (false, w),
            };
            let n = digits
                .parse::<usize>()
                .map_err(|_| Error::format(format!("invalid width '{w}' for '{name}'")))?;
            Some(if right { Align::Right(n) } else { Align::Left(n) })
        }
    };

    Ok(Segment::Field(field, align))
}

/// Reject strftime strings chrono cannot render.
pub fn validate_datefmt(datefmt: &str) -> Result<()> {
    if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
        return Err(Error::format(format!("invalid date format {datefmt:?}")));
    }
    Ok(())
}

/// `FormatEvent` implementation rendering events through a [`Template`].
pub struct TemplateFormat {
    logger_name: String,
    template: Template,
    datefmt: String,
}

impl TemplateFormat {
    pub fn new(logger_name: impl Into<String>, template: Template, datefmt: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            template,
            datefmt: datefmt.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for TemplateFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        for segment in &self.template.segments {
            let (field, align) = match segment {
                Segment::Literal(text) => {
                    writer.write_str(text)?;
                    continue;
                }
                Segment::Field(field, align) => (*field, *align),
            };

            let value = match field {
                Field::Name => self.logger_name.clone(),
                Field::Asctime => Local::now().format(&self.datefmt).to_string(),
                Field::Levelname => meta.level().to_string(),
                Field::Filename => meta
                    .file()
                    .and_then(|f| Path::new(f).file_name())
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                Field::Lineno => meta.line().map(|l| l.to_string()).unwrap_or_default(),
                Field::Target => meta.target().to_string(),
                Field::Message => {
                    let mut buf = String::new();
                    ctx.format_fields(Writer::new(&mut buf), event)?;
                    buf
                }
            };

            match align {
                None => writer.write_str(&value)?,
                Some(Align::Left(width)) => write!(writer, "{value:<width$}")?,
                Some(Align::Right(width)) => write!(writer, "{value:>width$}")?,
            }
        }

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_template() {
        let template =
            Template::parse("{name} {asctime} {levelname:<8} {filename}:{lineno:<4} {message}")
                .unwrap();
        let fields: Vec<Field> = template
            .segments()
            .iter()
            .filter_map(|s| match s {
                Segment::Field(f, _) => Some(*f),
                Segment::Literal(_) => None,
            })
            .collect();
        assert_eq!(
            fields,
            vec![
                Field::Name,
                Field::Asctime,
                Field::Levelname,
                Field::Filename,
                Field::Lineno,
                Field::Message
            ]
        );
        assert!(template
            .segments()
            .contains(&Segment::Field(Field::Levelname, Some(Align::Left(8)))));
    }

    #[test]
    fn test_parse_escaped_braces() {
        let template = Template::parse("{{{message}}}").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("{".to_string()),
                Segment::Field(Field::Message, None),
                Segment::Literal("}".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_right_alignment() {
        let template = Template::parse("{lineno:>5}").unwrap();
        assert_eq!(
            template.segments(),
            &[Segment::Field(Field::Lineno, Some(Align::Right(5)))]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Template::parse("{nope}").is_err());
        assert!(Template::parse("{message").is_err());
        assert!(Template::parse("oops}").is_err());
        assert!(Template::parse("{levelname:<x}").is_err());
    }

    #[test]
    fn test_validate_datefmt() {
        assert!(validate_datefmt("%Y-%m-%d %H:%M:%S").is_ok());
        assert!(validate_datefmt("%Q").is_err());
    }
}
