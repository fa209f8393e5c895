use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::FormatError,
    format::{ElementType, Format},
};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([0-9]+)(.)\)\[([^\]]*)\]").expect("token pattern must compile")
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[_a-zA-Z][_a-zA-Z0-9]+$").expect("identifier pattern must compile")
});

/// Strips every whitespace character. The result is the cache key.
pub fn normalize(spec: &str) -> String {
    spec.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parses an already normalized format string.
///
/// The input must be a concatenation of `(<count><type>)[<name>]` tokens with
/// nothing before, between or after them.
pub(crate) fn parse_normalized(spec: &str) -> Result<Format, FormatError> {
    if spec.is_empty() {
        return Err(FormatError::Empty);
    }

    let mut fields = Vec::new();
    let mut cursor = 0;

    for caps in TOKEN.captures_iter(spec) {
        let whole = caps.get(0).expect("group 0 is always present");
        if whole.start() != cursor {
            return Err(malformed(spec, cursor, whole.start()));
        }

        let element_type = ElementType::from_char(caps[2].chars().next().unwrap_or_default())?;
        let count = parse_count(&caps[1])?;

        let name = &caps[3];
        if !IDENTIFIER.is_match(name) {
            return Err(FormatError::InvalidName(name.to_owned()));
        }

        fields.push((name.to_owned(), element_type, count));
        cursor = whole.end();
    }

    if cursor != spec.len() {
        return Err(malformed(spec, cursor, spec.len()));
    }

    Format::from_fields(fields)
}

fn parse_count(digits: &str) -> Result<usize, FormatError> {
    if digits.starts_with('0') {
        return Err(FormatError::InvalidCount(digits.to_owned()));
    }
    digits
        .parse::<usize>()
        .map_err(|_| FormatError::InvalidCount(digits.to_owned()))
}

fn malformed(spec: &str, start: usize, end: usize) -> FormatError {
    FormatError::Malformed {
        position: start,
        unmatched: spec[start..end].to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(spec: &str) -> Result<Format, FormatError> {
        parse_normalized(&normalize(spec))
    }

    #[test]
    fn parses_fields_in_order() {
        let format = parse("(3f)[vertex](4B)[color](1I)[id]").unwrap();
        let fields = format.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "vertex");
        assert_eq!(fields[0].element_type, ElementType::F32);
        assert_eq!(fields[0].count, 3);
        assert_eq!(fields[1].offset, 12);
        assert_eq!(fields[1].element_type, ElementType::U8);
        assert_eq!(fields[2].offset, 16);
        assert_eq!(format.record_size(), 20);
    }

    #[test]
    fn whitespace_is_ignored() {
        let a = parse("(4f)[foo] (4f)[bar]\t(4d)[yolo]\n").unwrap();
        let b = parse("(4f)[foo](4f)[bar](4d)[yolo]").unwrap();
        assert_eq!(a, b);
        assert_eq!(parse("( 1 2 i ) [ ab ]").unwrap().fields()[0].count, 12);
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(parse(""), Err(FormatError::Empty));
        assert_eq!(parse("  \n "), Err(FormatError::Empty));
    }

    #[test]
    fn stray_text_is_rejected_anywhere() {
        assert_eq!(
            parse("(3f)[vertex]extra"),
            Err(FormatError::Malformed {
                position: 12,
                unmatched: "extra".into()
            })
        );
        assert!(matches!(
            parse("x(3f)[vertex]"),
            Err(FormatError::Malformed { position: 0, .. })
        ));
        assert!(matches!(
            parse("(3f)[vertex],(1i)[id]"),
            Err(FormatError::Malformed { position: 12, .. })
        ));
        assert!(matches!(parse("(3f)"), Err(FormatError::Malformed { .. })));
        assert!(matches!(parse("(ff)[ab]"), Err(FormatError::Malformed { .. })));
    }

    #[test]
    fn unknown_type_char_is_rejected() {
        assert_eq!(parse("(3x)[v]"), Err(FormatError::UnknownType('x')));
        assert_eq!(parse("(3f)[ok](2q)[vv]"), Err(FormatError::UnknownType('q')));
    }

    #[test]
    fn bad_counts_are_rejected() {
        assert_eq!(parse("(0f)[ab]"), Err(FormatError::InvalidCount("0".into())));
        assert_eq!(parse("(03f)[ab]"), Err(FormatError::InvalidCount("03".into())));
        assert!(matches!(
            parse("(99999999999999999999999f)[ab]"),
            Err(FormatError::InvalidCount(_))
        ));
    }

    #[test]
    fn counts_must_be_ascii_digits() {
        assert!(matches!(
            parse("(\u{0663}f)[ab]"),
            Err(FormatError::Malformed { position: 0, .. })
        ));
        assert!(matches!(
            parse("(1f)[ok](\u{FF12}i)[id]"),
            Err(FormatError::Malformed { position: 8, .. })
        ));
    }

    #[test]
    fn oversized_records_are_rejected() {
        assert_eq!(
            parse(&format!("({}f)[ab]", usize::MAX)),
            Err(FormatError::TooLarge("ab".into()))
        );
        let half = usize::MAX / 2;
        assert_eq!(
            parse(&format!("({half}B)[aa]({half}B)[bb](2B)[cc]")),
            Err(FormatError::TooLarge("cc".into()))
        );
        let widest = usize::MAX / 8;
        assert_eq!(parse(&format!("({widest}d)[ab]")).unwrap().record_size(), widest * 8);
    }

    #[test]
    fn bad_names_are_rejected() {
        assert_eq!(parse("(3f)[v]"), Err(FormatError::InvalidName("v".into())));
        assert_eq!(parse("(3f)[9lives]"), Err(FormatError::InvalidName("9lives".into())));
        assert_eq!(parse("(3f)[a-b]"), Err(FormatError::InvalidName("a-b".into())));
        assert_eq!(parse("(3f)[]"), Err(FormatError::InvalidName("".into())));
        assert!(parse("(3f)[_x]").is_ok());
        assert!(parse("(3f)[pos_2]").is_ok());
    }
}
