//! Recognizer for the GTS identifier grammar.
//!
//! ```text
//! identifier     = [_a-z] [_a-z0-9]*
//! version        = "v" digits ( "." digits )?
//! segment        = identifier "." identifier "." identifier "." identifier "." version
//! pattern_seg    = identifier ( "." identifier ){0,3} ( "." ( "*" | version ) )?
//! type_id        = "gts." ( segment "~" )+
//! instance_id    = "gts." segment ( "~" segment )*
//! pattern        = "gts." pattern_seg ( "~" pattern_seg )*
//! ```
//!
//! Every entry point must consume its whole input; a single stray character
//! rejects the identifier. The only lookahead is in `pattern_segment`, where an
//! optional name component is taken only when the `.` is followed by an
//! identifier start, so an omitted suffix never re-appears later.
//!
//! Parse products borrow from the input and do not allocate beyond the
//! segment list.

use tracing::trace;

use crate::error::GtsError;

/// Maximum length of an identifier, in characters.
pub const MAX_LENGTH: usize = 1024;

const GTS_PREFIX: &str = "gts";

/// A `vMAJOR[.MINOR]` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedVersion {
    pub major: u32,
    pub minor: Option<u32>,
}

/// One `vendor.package.namespace.type.version` unit as recognized.
///
/// In strict segments every field is present. Pattern segments may stop
/// after any name component and may end in `*` instead of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSegment<'a> {
    pub vendor: &'a str,
    pub package: Option<&'a str>,
    pub namespace: Option<&'a str>,
    pub type_name: Option<&'a str>,
    pub version: Option<ParsedVersion>,
    /// Set for pattern segments left open: trailing components omitted or `*`.
    pub wildcard: bool,
}

/// Which top-level rule accepted the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedKind {
    Type,
    Instance,
    Pattern,
}

/// A fully recognized identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedId<'a> {
    pub kind: ParsedKind,
    pub segments: Vec<ParsedSegment<'a>>,
}

/// Parses a type identifier: every segment is terminated by `~`.
pub fn parse_type_id(input: &str) -> Result<ParsedId<'_>, GtsError> {
    parse_all(input, |c| {
        Ok(ParsedId {
            kind: ParsedKind::Type,
            segments: type_id(c)?,
        })
    })
}

/// Parses an instance identifier: segments separated by `~`, no trailing `~`.
pub fn parse_instance_id(input: &str) -> Result<ParsedId<'_>, GtsError> {
    parse_all(input, |c| {
        Ok(ParsedId {
            kind: ParsedKind::Instance,
            segments: instance_id(c)?,
        })
    })
}

/// Parses a pattern: partial segments separated by `~`.
pub fn parse_pattern(input: &str) -> Result<ParsedId<'_>, GtsError> {
    parse_all(input, |c| {
        Ok(ParsedId {
            kind: ParsedKind::Pattern,
            segments: pattern(c)?,
        })
    })
}

/// Parses a single name token (`[_a-z][_a-z0-9]*`).
pub fn parse_identifier(input: &str) -> Result<&str, GtsError> {
    parse_all(input, identifier)
}

/// Parses a `vMAJOR[.MINOR]` version.
pub fn parse_version(input: &str) -> Result<ParsedVersion, GtsError> {
    parse_all(input, version)
}

/// Parses one strict segment without the `gts.` prefix.
pub fn parse_segment(input: &str) -> Result<ParsedSegment<'_>, GtsError> {
    parse_all(input, segment)
}

/// Parses one pattern segment without the `gts.` prefix.
pub fn parse_pattern_segment(input: &str) -> Result<ParsedSegment<'_>, GtsError> {
    parse_all(input, pattern_segment)
}

// =============================================================================
// Cursor
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Failure {
    position: usize,
    expected: &'static str,
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos + 1).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), Failure> {
        if self.eat(byte) {
            Ok(())
        } else {
            self.fail(expected)
        }
    }

    fn fail<T>(&self, expected: &'static str) -> Result<T, Failure> {
        Err(Failure {
            position: self.pos,
            expected,
        })
    }
}

fn parse_all<'a, T>(
    input: &'a str,
    rule: impl FnOnce(&mut Cursor<'a>) -> Result<T, Failure>,
) -> Result<T, GtsError> {
    if input.is_empty() {
        return Err(GtsError::Empty);
    }

    let len = input.chars().count();
    if len > MAX_LENGTH {
        return Err(GtsError::TooLong {
            len,
            max: MAX_LENGTH,
        });
    }

    let mut cursor = Cursor::new(input);
    let result = rule(&mut cursor).and_then(|value| {
        if cursor.at_end() {
            Ok(value)
        } else {
            cursor.fail("end of input")
        }
    });

    result.map_err(|failure| {
        trace!(
            input,
            position = failure.position,
            expected = failure.expected,
            "rejected GTS identifier"
        );
        GtsError::Grammar {
            input: input.to_string(),
            position: failure.position,
            expected: failure.expected,
        }
    })
}

// =============================================================================
// Rules
// =============================================================================

fn is_identifier_start(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_lowercase()
}

fn is_identifier_rest(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_lowercase() || byte.is_ascii_digit()
}

fn identifier<'a>(c: &mut Cursor<'a>) -> Result<&'a str, Failure> {
    let start = c.pos;
    match c.peek() {
        Some(b) if is_identifier_start(b) => c.pos += 1,
        _ => return c.fail("identifier"),
    }
    while c.peek().is_some_and(is_identifier_rest) {
        c.pos += 1;
    }
    Ok(&c.input[start..c.pos])
}

fn number(c: &mut Cursor<'_>, expected: &'static str) -> Result<u32, Failure> {
    let start = c.pos;
    while c.peek().is_some_and(|b| b.is_ascii_digit()) {
        c.pos += 1;
    }
    if start == c.pos {
        return c.fail(expected);
    }
    c.input[start..c.pos].parse::<u32>().map_err(|_| Failure {
        position: start,
        expected,
    })
}

fn version(c: &mut Cursor<'_>) -> Result<ParsedVersion, Failure> {
    c.expect(b'v', "version")?;
    let major = number(c, "major version")?;
    let minor = if c.eat(b'.') {
        Some(number(c, "minor version")?)
    } else {
        None
    };
    Ok(ParsedVersion { major, minor })
}

fn segment<'a>(c: &mut Cursor<'a>) -> Result<ParsedSegment<'a>, Failure> {
    let vendor = identifier(c)?;
    c.expect(b'.', "'.'")?;
    let package = identifier(c)?;
    c.expect(b'.', "'.'")?;
    let namespace = identifier(c)?;
    c.expect(b'.', "'.'")?;
    let type_name = identifier(c)?;
    c.expect(b'.', "'.'")?;
    let version = version(c)?;

    Ok(ParsedSegment {
        vendor,
        package: Some(package),
        namespace: Some(namespace),
        type_name: Some(type_name),
        version: Some(version),
        wildcard: false,
    })
}

fn pattern_segment<'a>(c: &mut Cursor<'a>) -> Result<ParsedSegment<'a>, Failure> {
    let vendor = identifier(c)?;

    let mut names: [Option<&'a str>; 3] = [None; 3];
    for slot in names.iter_mut() {
        if c.peek() == Some(b'.') && c.peek_next().is_some_and(is_identifier_start) {
            c.pos += 1;
            *slot = Some(identifier(c)?);
        } else {
            break;
        }
    }

    let mut parsed_version = None;
    if c.eat(b'.') {
        match c.peek() {
            Some(b'*') => c.pos += 1,
            Some(b'v') => parsed_version = Some(version(c)?),
            _ => return c.fail("'*' or version"),
        }
    }

    let [package, namespace, type_name] = names;
    Ok(ParsedSegment {
        vendor,
        package,
        namespace,
        type_name,
        version: parsed_version,
        wildcard: parsed_version.is_none(),
    })
}

fn gts_prefix(c: &mut Cursor<'_>) -> Result<(), Failure> {
    if !c.input[c.pos..].starts_with(GTS_PREFIX) {
        return c.fail("'gts' prefix");
    }
    c.pos += GTS_PREFIX.len();
    c.expect(b'.', "'.'")
}

fn type_id<'a>(c: &mut Cursor<'a>) -> Result<Vec<ParsedSegment<'a>>, Failure> {
    gts_prefix(c)?;
    let mut segments = Vec::new();
    loop {
        segments.push(segment(c)?);
        c.expect(b'~', "'~'")?;
        if c.at_end() {
            return Ok(segments);
        }
    }
}

fn instance_id<'a>(c: &mut Cursor<'a>) -> Result<Vec<ParsedSegment<'a>>, Failure> {
    gts_prefix(c)?;
    let mut segments = vec![segment(c)?];
    while c.eat(b'~') {
        segments.push(segment(c)?);
    }
    Ok(segments)
}

fn pattern<'a>(c: &mut Cursor<'a>) -> Result<Vec<ParsedSegment<'a>>, Failure> {
    gts_prefix(c)?;
    let mut segments = vec![pattern_segment(c)?];
    while c.eat(b'~') {
        segments.push(pattern_segment(c)?);
    }
    Ok(segments)
}

// =============================================================================
// Tests
// =============================================================================
