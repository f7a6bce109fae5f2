//! Command grammar sent to gnuplot
//!
//! Builders for every command line the session produces, plus the number
//! formatting shared with the data files and the length limit applied
//! before a line goes down the pipe.
//!
//! | Builder | Produces |
//! |---|---|
//! | [`set_title`] | `set title '<text>'` |
//! | [`set_xlabel`] / [`set_ylabel`] | `set xlabel "<text>"` |
//! | [`plot_file`] | `plot "<path>" [title "<text>"] with <style>` |
//! | [`plot_slope`] | `plot <a> * x + <b> title "<text>" with <style>` |
//! | [`plot_equation`] | `plot <expr> title "<text>" with <style>` |

use crate::config::OverlongPolicy;
use crate::error::{PlotError, Result};
use crate::types::{DrawStyle, PlotVerb};
use std::path::Path;

/// Title used by function plots when the caller gives none
pub const NO_TITLE: &str = "no title";

/// Shortest decimal text that reads back as the same `f64`
///
/// Integral values drop the trailing `.0`, very large and very small
/// magnitudes use exponent notation.
pub fn format_number(value: f64) -> String {
    let text = format!("{:?}", value);
    match text.strip_suffix(".0") {
        Some(integral) => integral.to_string(),
        None => text,
    }
}

/// Wrap `text` in double quotes
///
/// With `escape` set, backslashes and double quotes are escaped and line
/// breaks become `\n`, so the text can neither end the string early nor
/// start a second command.
pub fn quote_double(text: &str, escape: bool) -> String {
    if !escape {
        return format!("\"{}\"", text);
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Wrap `text` in single quotes
///
/// Single-quoted gnuplot strings take no backslash escapes; with `escape`
/// set, a quote is doubled and line breaks become spaces.
pub fn quote_single(text: &str, escape: bool) -> String {
    if !escape {
        return format!("'{}'", text);
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

pub fn set_title(title: &str, escape: bool) -> String {
    format!("set title {}", quote_single(title, escape))
}

pub fn set_xlabel(label: &str, escape: bool) -> String {
    format!("set xlabel {}", quote_double(label, escape))
}

pub fn set_ylabel(label: &str, escape: bool) -> String {
    format!("set ylabel {}", quote_double(label, escape))
}

/// Plot a data file; the title clause is omitted when `title` is `None`
pub fn plot_file(
    verb: PlotVerb,
    path: &Path,
    title: Option<&str>,
    style: DrawStyle,
    escape: bool,
) -> String {
    // Paths are always escaped: they are not caller text.
    let path = quote_double(&path.to_string_lossy(), true);
    match title {
        Some(title) => format!(
            "{} {} title {} with {}",
            verb,
            path,
            quote_double(title, escape),
            style
        ),
        None => format!("{} {} with {}", verb, path, style),
    }
}

/// Plot the line `y = a*x + b`
pub fn plot_slope(
    verb: PlotVerb,
    a: f64,
    b: f64,
    title: Option<&str>,
    style: DrawStyle,
    escape: bool,
) -> String {
    format!(
        "{} {} * x + {} title {} with {}",
        verb,
        format_number(a),
        format_number(b),
        quote_double(title.unwrap_or(NO_TITLE), escape),
        style
    )
}

/// Plot `y = <expression>`; the expression is passed through untouched
pub fn plot_equation(
    verb: PlotVerb,
    expression: &str,
    title: Option<&str>,
    style: DrawStyle,
    escape: bool,
) -> String {
    format!(
        "{} {} title {} with {}",
        verb,
        expression,
        quote_double(title.unwrap_or(NO_TITLE), escape),
        style
    )
}

/// Maximum command length and what to do beyond it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLimit {
    pub max_len: usize,
    pub policy: OverlongPolicy,
}

impl CommandLimit {
    pub fn new(max_len: usize, policy: OverlongPolicy) -> Self {
        Self { max_len, policy }
    }

    /// The part of `line` that may be sent
    ///
    /// Under [`OverlongPolicy::Truncate`] the result is the longest prefix
    /// that fits and ends on a char boundary; compare lengths to detect a
    /// cut.
    pub fn fit<'a>(&self, line: &'a str) -> Result<&'a str> {
        if line.len() <= self.max_len {
            return Ok(line);
        }
        match self.policy {
            OverlongPolicy::Reject => Err(PlotError::CommandTooLong {
                len: line.len(),
                max: self.max_len,
            }),
            OverlongPolicy::Truncate => {
                let mut end = self.max_len;
                while !line.is_char_boundary(end) {
                    end -= 1;
                }
                Ok(&line[..end])
            }
        }
    }
}
