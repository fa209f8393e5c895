use std::sync::Arc;

use glbuffers::{
    ElementType, FormatError, IntoFormat, parse_format,
    format::{global_cache, normalize},
};

#[test]
fn whitespace_variants_parse_equal() {
    let specs = [
        "(3f)[vertex](1i)[id]",
        "(3f)[vertex] (1i)[id]",
        " ( 3 f ) [ vertex ]\n(1i)\t[id] ",
    ];
    let formats: Vec<_> = specs.iter().map(|s| parse_format(s).unwrap()).collect();
    for format in &formats[1..] {
        assert_eq!(**format, *formats[0]);
    }
    assert_eq!(normalize(specs[2]), specs[0]);
}

#[test]
fn vertex_and_id_layout() {
    let format = parse_format("(3f)[vertex](1i)[id]").unwrap();
    assert_eq!(format.record_size(), 3 * 4 + 4);

    let vertex = format.field("vertex").unwrap();
    assert_eq!(vertex.offset, 0);
    assert_eq!(vertex.count, 3);
    assert_eq!(vertex.element_type, ElementType::F32);

    let id = format.field("id").unwrap();
    assert_eq!(id.offset, 12);
    assert_eq!(id.element_type, ElementType::I32);
    assert_eq!(id.shape(), "1i");
}

#[test]
fn every_type_char_is_accepted() {
    let format = parse_format("(1f)[aa](1d)[bb](1b)[cc](1B)[dd](1s)[ee](1S)[ff](1i)[gg](1I)[hh]")
        .unwrap();
    let types: Vec<_> = format.fields().iter().map(|f| f.element_type).collect();
    assert_eq!(types, ElementType::ALL);
    assert_eq!(format.record_size(), 4 + 8 + 1 + 1 + 2 + 2 + 4 + 4);
}

#[test]
fn syntax_errors() {
    assert_eq!(parse_format("").unwrap_err(), FormatError::Empty);
    assert!(matches!(
        parse_format("(3f)[vertex]extra").unwrap_err(),
        FormatError::Malformed { .. }
    ));
    assert_eq!(
        parse_format("(3x)[v]").unwrap_err(),
        FormatError::UnknownType('x')
    );
    assert_eq!(
        parse_format("(2f)[1st]").unwrap_err(),
        FormatError::InvalidName("1st".into())
    );
}

#[test]
fn repeated_parses_share_the_cached_descriptor() {
    let spec = "(2f)[uv_shared_cache_test](4B)[tint]";
    let a = parse_format(spec).unwrap();
    let b = parse_format(&format!(" {spec} ")).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(global_cache().contains(spec));
}

#[test]
fn existing_descriptor_converts_to_itself() {
    let format = parse_format("(4f)[color]").unwrap();
    let same = Arc::clone(&format).into_format().unwrap();
    assert!(Arc::ptr_eq(&format, &same));
    assert_eq!(format.to_string(), "(4f)[color]");
}
