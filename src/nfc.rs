//! Decoding of the payloads read from XIVE NFC tags.
//!
//! A tag carries a single NDEF text record whose text starts with a token of
//! the form `stamp:<uuid>` or `event:<uuid>`, optionally followed by
//! arbitrary trailing data.

use nom::branch::alt;
use nom::bytes::complete::{tag, take};
use nom::character::complete::char;
use nom::combinator::{all_consuming, recognize, value, verify};
use nom::number::complete::be_u8;
use nom::sequence::{separated_pair, tuple};
use nom::IResult;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::provider::{Error, ErrorKind, Result};

const UTF16_FLAG: u8 = 0x80;
const LANG_LEN_MASK: u8 = 0x3f;

#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum TagKind {
    #[display(fmt = "stamp")]
    Stamp,
    #[display(fmt = "event")]
    Event,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagToken {
    pub kind: TagKind,
    pub id: Uuid,
}

impl fmt::Display for TagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id.hyphenated())
    }
}

fn hex_group<'a>(len: usize) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    verify(take(len), |group: &str| {
        group.chars().all(|c| c.is_ascii_hexdigit())
    })
}

fn token(input: &str) -> IResult<&str, (TagKind, &str)> {
    separated_pair(
        alt((
            value(TagKind::Stamp, tag("stamp")),
            value(TagKind::Event, tag("event")),
        )),
        char(':'),
        recognize(tuple((
            hex_group(8),
            char('-'),
            hex_group(4),
            char('-'),
            hex_group(4),
            char('-'),
            hex_group(4),
            char('-'),
            hex_group(12),
        ))),
    )(input)
}

fn text_record(input: &[u8]) -> IResult<&[u8], (u8, &[u8])> {
    type E<'a> = nom::error::Error<&'a [u8]>;

    let (input, status) = be_u8::<_, E<'_>>(input)?;
    let (input, language) = take::<_, _, E<'_>>(status & LANG_LEN_MASK)(input)?;
    Ok((input, (status, language)))
}

/// Strips the status byte and language code of an NDEF text record.
pub fn strip_text_record_header(payload: &[u8]) -> Result<String> {
    let (text, (status, language)) = text_record(payload).map_err(|_| {
        Error::new(
            ErrorKind::TagParse,
            "Payload is shorter than its text record header",
        )
    })?;

    if status & UTF16_FLAG != 0 {
        return Err(Error::new(
            ErrorKind::TagParse,
            "UTF-16 text records are not supported",
        ));
    }

    let text = String::from_utf8(text.to_vec()).map_err(|err| {
        Error::new(
            ErrorKind::TagParse,
            &format!("Text record is not valid UTF-8: {}", err),
        )
    })?;

    log::debug!(
        "Read text record ({}): {}",
        String::from_utf8_lossy(language),
        text
    );

    Ok(text)
}

/// The leading `stamp:`/`event:` token of `content`, or `content` itself if
/// there is none.
pub fn format_token(content: &str) -> String {
    match recognize(token)(content) {
        Ok((_, matched)) => matched.to_owned(),
        Err(_) => content.to_owned(),
    }
}

/// Full decoding path from raw tag bytes to a token.
pub fn decode_tag(payload: &[u8]) -> Result<TagToken> {
    let text = strip_text_record_header(payload)?;
    format_token(&text).parse()
}

impl FromStr for TagToken {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (_, (kind, id)) = all_consuming(token)(s.trim()).map_err(|_| {
            Error::new(
                ErrorKind::TagParse,
                &format!("'{}' is not a stamp or event token", s),
            )
        })?;

        let id = Uuid::parse_str(id)
            .map_err(|err| Error::new(ErrorKind::TagParse, &err.to_string()))?;

        Ok(TagToken { kind, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT_ID: &str = "3f2504e0-4f89-11d3-9a0c-0305e82c3301";

    #[test]
    fn token_prefix_is_extracted() {
        let content = format!("event:{}?utm=tag", EVENT_ID);
        assert_eq!(format_token(&content), format!("event:{}", EVENT_ID));
    }

    #[test]
    fn uppercase_hex_is_kept() {
        let content = "stamp:3F2504E0-4F89-11D3-9A0C-0305E82C3301";
        assert_eq!(format_token(content), content);
    }

    #[test]
    fn unknown_content_is_returned_unchanged() {
        assert_eq!(format_token("https://xive.co.kr"), "https://xive.co.kr");
        assert_eq!(format_token("ticket:1234"), "ticket:1234");
        assert_eq!(format_token("event:3f2504e0-4f89"), "event:3f2504e0-4f89");
        assert_eq!(format_token(""), "");
    }

    #[test]
    fn parse_token() {
        let token = format!("stamp:{}", EVENT_ID).parse::<TagToken>().unwrap();
        assert_eq!(token.kind, TagKind::Stamp);
        assert_eq!(token.id, Uuid::parse_str(EVENT_ID).unwrap());
        assert_eq!(token.to_string(), format!("stamp:{}", EVENT_ID));
    }

    #[test]
    fn parse_rejects_trailing_data() {
        let err = format!("event:{}/x", EVENT_ID)
            .parse::<TagToken>()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TagParse));
    }

    #[test]
    fn text_record_header_is_stripped() {
        let mut payload = vec![0x02, b'e', b'n'];
        payload.extend_from_slice(format!("event:{}", EVENT_ID).as_bytes());

        assert_eq!(
            strip_text_record_header(&payload).unwrap(),
            format!("event:{}", EVENT_ID)
        );
    }

    #[test]
    fn language_length_comes_from_status() {
        let payload = b"\x05ko-KRhello";
        assert_eq!(strip_text_record_header(payload).unwrap(), "hello");
    }

    #[test]
    fn short_or_utf16_payloads_fail() {
        assert!(strip_text_record_header(b"").is_err());
        assert!(strip_text_record_header(b"\x02e").is_err());
        assert!(strip_text_record_header(b"\x82enab").is_err());
        assert!(strip_text_record_header(b"\x02en\xff\xfe").is_err());
    }

    #[test]
    fn decode_full_tag() {
        let mut payload = b"\x02en".to_vec();
        payload.extend_from_slice(format!("event:{}#frida", EVENT_ID).as_bytes());

        let token = decode_tag(&payload).unwrap();
        assert_eq!(token.kind, TagKind::Event);
        assert_eq!(token.id, Uuid::parse_str(EVENT_ID).unwrap());
    }

    #[test]
    fn decode_tag_without_token_fails() {
        assert!(decode_tag(b"\x02enhttps://xive.co.kr").is_err());
    }
}
