use arbor_cbor::{CborError, DecodeLimits, ErrorCode, EventParser, EventSink, Position, TagKind};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Uint(u64, TagKind),
    Int(i64, TagKind),
    Double(f64, TagKind),
    Bool(bool),
    Null,
    Str(String, TagKind),
    Bytes(Vec<u8>, TagKind),
    Bignum(bool, Vec<u8>),
    BeginArray(Option<usize>),
    EndArray,
    BeginMap(Option<usize>),
    EndMap,
    Name(String),
    Flush,
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    columns: Vec<usize>,
}

impl Recorder {
    fn push(&mut self, event: Event, pos: Position) {
        assert_eq!(pos.line, 1);
        self.events.push(event);
        self.columns.push(pos.column);
    }
}

impl EventSink for Recorder {
    fn uint64_value(&mut self, value: u64, tag: TagKind, pos: Position) {
        self.push(Event::Uint(value, tag), pos);
    }

    fn int64_value(&mut self, value: i64, tag: TagKind, pos: Position) {
        self.push(Event::Int(value, tag), pos);
    }

    fn double_value(&mut self, value: f64, tag: TagKind, pos: Position) {
        self.push(Event::Double(value, tag), pos);
    }

    fn bool_value(&mut self, value: bool, pos: Position) {
        self.push(Event::Bool(value), pos);
    }

    fn null_value(&mut self, pos: Position) {
        self.push(Event::Null, pos);
    }

    fn string_value(&mut self, value: &str, tag: TagKind, pos: Position) {
        self.push(Event::Str(value.into(), tag), pos);
    }

    fn byte_string_value(&mut self, value: &[u8], tag: TagKind, pos: Position) {
        self.push(Event::Bytes(value.into(), tag), pos);
    }

    fn bignum_value(&mut self, negative: bool, magnitude: &[u8], pos: Position) {
        self.push(Event::Bignum(negative, magnitude.into()), pos);
    }

    fn begin_array(&mut self, len: Option<usize>, pos: Position) {
        self.push(Event::BeginArray(len), pos);
    }

    fn end_array(&mut self, pos: Position) {
        self.push(Event::EndArray, pos);
    }

    fn begin_map(&mut self, len: Option<usize>, pos: Position) {
        self.push(Event::BeginMap(len), pos);
    }

    fn end_map(&mut self, pos: Position) {
        self.push(Event::EndMap, pos);
    }

    fn name(&mut self, name: &str, pos: Position) {
        self.push(Event::Name(name.into()), pos);
    }

    fn flush(&mut self) {
        self.events.push(Event::Flush);
    }
}

fn events(bytes: &[u8]) -> Vec<Event> {
    let mut parser = EventParser::new(Recorder::default());
    parser.update(bytes);
    parser.parse_some().unwrap();
    assert!(parser.is_done(), "input not fully consumed");
    parser.into_sink().events
}

fn parse_err(bytes: &[u8]) -> CborError {
    let mut parser = EventParser::new(Recorder::default());
    parser.update(bytes);
    parser.parse_some().unwrap_err()
}

#[test]
fn small_unsigned_integers() {
    assert_eq!(
        events(&[0x00]),
        vec![Event::Uint(0, TagKind::None), Event::Flush]
    );
    assert_eq!(
        events(&[0x17]),
        vec![Event::Uint(23, TagKind::None), Event::Flush]
    );
    assert_eq!(
        events(&[0x18, 0x18]),
        vec![Event::Uint(24, TagKind::None), Event::Flush]
    );
}

#[test]
fn negative_integer() {
    assert_eq!(
        events(&[0x20]),
        vec![Event::Int(-1, TagKind::None), Event::Flush]
    );
}

#[test]
fn text_string() {
    assert_eq!(
        events(&[0x64, b'I', b'E', b'T', b'F']),
        vec![Event::Str("IETF".into(), TagKind::None), Event::Flush]
    );
}

#[test]
fn array_of_three() {
    assert_eq!(
        events(&[0x83, 0x01, 0x02, 0x03]),
        vec![
            Event::BeginArray(Some(3)),
            Event::Uint(1, TagKind::None),
            Event::Uint(2, TagKind::None),
            Event::Uint(3, TagKind::None),
            Event::EndArray,
            Event::Flush,
        ]
    );
}

#[test]
fn map_of_two() {
    assert_eq!(
        events(&[0xa2, 0x61, b'a', 0x01, 0x61, b'b', 0x02]),
        vec![
            Event::BeginMap(Some(2)),
            Event::Name("a".into()),
            Event::Uint(1, TagKind::None),
            Event::Name("b".into()),
            Event::Uint(2, TagKind::None),
            Event::EndMap,
            Event::Flush,
        ]
    );
}

#[test]
fn epoch_time_tag() {
    assert_eq!(
        events(&[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]),
        vec![Event::Uint(1_363_896_240, TagKind::EpochTime), Event::Flush]
    );
    // Negative and floating-point epoch times carry the same annotation.
    assert_eq!(
        events(&[0xc1, 0x20]),
        vec![Event::Int(-1, TagKind::EpochTime), Event::Flush]
    );
    assert_eq!(
        events(&[0xc1, 0xfb, 0x41, 0xd4, 0x52, 0xd9, 0xec, 0x20, 0x00, 0x00]),
        vec![
            Event::Double(1_363_896_240.5, TagKind::EpochTime),
            Event::Flush,
        ]
    );
}

#[test]
fn date_time_tag() {
    let mut doc = vec![0xc0, 0x74];
    doc.extend_from_slice(b"2013-03-21T20:04:00Z");
    assert_eq!(
        events(&doc),
        vec![
            Event::Str("2013-03-21T20:04:00Z".into(), TagKind::DateTime),
            Event::Flush,
        ]
    );
}

#[test]
fn bignum_tags() {
    // 18446744073709551616 == 2^64.
    let pos = [0xc2, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(
        events(&pos),
        vec![
            Event::Bignum(false, vec![0x01, 0, 0, 0, 0, 0, 0, 0, 0]),
            Event::Flush,
        ]
    );

    let neg = [0xc3, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(
        events(&neg),
        vec![
            Event::Bignum(true, vec![0x01, 0, 0, 0, 0, 0, 0, 0, 0]),
            Event::Flush,
        ]
    );
}

#[test]
fn decimal_fraction_negative_exponent() {
    // 4([-2, 27315]) => "273.15"
    assert_eq!(
        events(&[0xc4, 0x82, 0x21, 0x19, 0x6a, 0xb3]),
        vec![
            Event::Str("273.15".into(), TagKind::Decimal),
            Event::Flush,
        ]
    );
}

#[test]
fn decimal_fraction_exponent_edges() {
    // 4([0, 3]) => "3.0"
    assert_eq!(
        events(&[0xc4, 0x82, 0x00, 0x03]),
        vec![Event::Str("3.0".into(), TagKind::Decimal), Event::Flush]
    );
    // 4([2, 27315]) => "27315e2", digits most-significant first.
    assert_eq!(
        events(&[0xc4, 0x82, 0x02, 0x19, 0x6a, 0xb3]),
        vec![Event::Str("27315e2".into(), TagKind::Decimal), Event::Flush]
    );
    // 4([12, 1]) => "1e12" pins the multi-digit exponent order.
    assert_eq!(
        events(&[0xc4, 0x82, 0x0c, 0x01]),
        vec![Event::Str("1e12".into(), TagKind::Decimal), Event::Flush]
    );
    // 4([-5, 27315]) => "0.27315"
    assert_eq!(
        events(&[0xc4, 0x82, 0x24, 0x19, 0x6a, 0xb3]),
        vec![Event::Str("0.27315".into(), TagKind::Decimal), Event::Flush]
    );
    // 4([-7, 27315]) => "0.27315e-2"
    assert_eq!(
        events(&[0xc4, 0x82, 0x26, 0x19, 0x6a, 0xb3]),
        vec![
            Event::Str("0.27315e-2".into(), TagKind::Decimal),
            Event::Flush,
        ]
    );
}

#[test]
fn decimal_fraction_negative_mantissa() {
    // 4([-2, -27315]) => "-273.15"
    assert_eq!(
        events(&[0xc4, 0x82, 0x21, 0x39, 0x6a, 0xb2]),
        vec![Event::Str("-273.15".into(), TagKind::Decimal), Event::Flush]
    );
}

#[test]
fn decimal_fraction_bignum_mantissa() {
    // 4([-2, 2(h'0100')]) => mantissa 256 => "2.56"
    assert_eq!(
        events(&[0xc4, 0x82, 0x21, 0xc2, 0x42, 0x01, 0x00]),
        vec![Event::Str("2.56".into(), TagKind::Decimal), Event::Flush]
    );
    // 4([0, 3(h'00')]) => mantissa -1 => "-1.0"
    assert_eq!(
        events(&[0xc4, 0x82, 0x00, 0xc3, 0x41, 0x00]),
        vec![Event::Str("-1.0".into(), TagKind::Decimal), Event::Flush]
    );
}

#[test]
fn decimal_fraction_shape_errors() {
    // Not an array.
    assert_eq!(parse_err(&[0xc4, 0x00]).code, ErrorCode::InvalidDecimal);
    // Wrong arity.
    assert_eq!(
        parse_err(&[0xc4, 0x81, 0x00]).code,
        ErrorCode::InvalidDecimal
    );
    // Text exponent.
    assert_eq!(
        parse_err(&[0xc4, 0x82, 0x61, b'a', 0x00]).code,
        ErrorCode::InvalidDecimal
    );
    // Bool mantissa.
    assert_eq!(
        parse_err(&[0xc4, 0x82, 0x00, 0xf5]).code,
        ErrorCode::InvalidDecimal
    );
}

#[test]
fn unknown_tags_are_stripped() {
    // 32("http://example.com") styled input: tag head consumed, no annotation.
    let mut doc = vec![0xd8, 0x20, 0x63];
    doc.extend_from_slice(b"uri");
    assert_eq!(
        events(&doc),
        vec![Event::Str("uri".into(), TagKind::None), Event::Flush]
    );
}

#[test]
fn stacked_tags_fold_innermost() {
    // 32(1(0)): the inner epoch tag wins.
    assert_eq!(
        events(&[0xd8, 0x20, 0xc1, 0x00]),
        vec![Event::Uint(0, TagKind::EpochTime), Event::Flush]
    );
    // 1(32(0)): the inner unknown tag strips the annotation.
    assert_eq!(
        events(&[0xc1, 0xd8, 0x20, 0x00]),
        vec![Event::Uint(0, TagKind::None), Event::Flush]
    );
}

#[test]
fn simple_values() {
    assert_eq!(events(&[0xf4]), vec![Event::Bool(false), Event::Flush]);
    assert_eq!(events(&[0xf5]), vec![Event::Bool(true), Event::Flush]);
    assert_eq!(events(&[0xf6]), vec![Event::Null, Event::Flush]);
}

#[test]
fn floats_widen() {
    assert_eq!(
        events(&[0xf9, 0x3c, 0x00]),
        vec![Event::Double(1.0, TagKind::None), Event::Flush]
    );
    assert_eq!(
        events(&[0xfa, 0x47, 0xc3, 0x50, 0x00]),
        vec![Event::Double(100_000.0, TagKind::None), Event::Flush]
    );
    assert_eq!(
        events(&[0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]),
        vec![Event::Double(1.1, TagKind::None), Event::Flush]
    );
}

#[test]
fn indefinite_array() {
    assert_eq!(
        events(&[0x9f, 0x01, 0x02, 0xff]),
        vec![
            Event::BeginArray(None),
            Event::Uint(1, TagKind::None),
            Event::Uint(2, TagKind::None),
            Event::EndArray,
            Event::Flush,
        ]
    );
}

#[test]
fn indefinite_map() {
    assert_eq!(
        events(&[0xbf, 0x61, b'a', 0x01, 0xff]),
        vec![
            Event::BeginMap(None),
            Event::Name("a".into()),
            Event::Uint(1, TagKind::None),
            Event::EndMap,
            Event::Flush,
        ]
    );
}

#[test]
fn indefinite_and_definite_streams_agree() {
    // [1, "ab"] in both encodings; only the begin lengths differ.
    let definite = [0x82, 0x01, 0x62, b'a', b'b'];
    let indefinite = [0x9f, 0x01, 0x7f, 0x61, b'a', 0x61, b'b', 0xff, 0xff];

    let mut d = events(&definite);
    let mut i = events(&indefinite);
    assert_eq!(d.remove(0), Event::BeginArray(Some(2)));
    assert_eq!(i.remove(0), Event::BeginArray(None));
    assert_eq!(d, i);
}

#[test]
fn chunked_strings_arrive_concatenated() {
    assert_eq!(
        events(&[0x7f, 0x62, b'h', b'i', 0x61, b'!', 0xff]),
        vec![Event::Str("hi!".into(), TagKind::None), Event::Flush]
    );
    assert_eq!(
        events(&[0x5f, 0x42, 0x01, 0x02, 0x41, 0x03, 0xff]),
        vec![
            Event::Bytes(vec![1, 2, 3], TagKind::None),
            Event::Flush,
        ]
    );
}

#[test]
fn empty_containers() {
    assert_eq!(
        events(&[0x80]),
        vec![Event::BeginArray(Some(0)), Event::EndArray, Event::Flush]
    );
    assert_eq!(
        events(&[0xa0]),
        vec![Event::BeginMap(Some(0)), Event::EndMap, Event::Flush]
    );
    assert_eq!(
        events(&[0x9f, 0xff]),
        vec![Event::BeginArray(None), Event::EndArray, Event::Flush]
    );
}

#[test]
fn nested_structure_stays_balanced() {
    // {"k": [1, {"x": null}]}
    let doc = [
        0xa1, 0x61, b'k', 0x82, 0x01, 0xa1, 0x61, b'x', 0xf6,
    ];
    let evs = events(&doc);
    let mut depth = 0i32;
    for e in &evs {
        match e {
            Event::BeginArray(_) | Event::BeginMap(_) => depth += 1,
            Event::EndArray | Event::EndMap => {
                depth -= 1;
                assert!(depth >= 0);
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0);
    assert_eq!(evs.last(), Some(&Event::Flush));
    assert_eq!(
        evs.iter().filter(|e| **e == Event::Flush).count(),
        1,
        "flush fires once, when depth returns to zero"
    );
}

#[test]
fn columns_are_byte_offsets_plus_one() {
    let mut parser = EventParser::new(Recorder::default());
    parser.update(&[0x83, 0x01, 0x02, 0x03]);
    parser.parse_some().unwrap();
    let rec = parser.into_sink();
    // begin_array at offset 0, elements at 1..=3, end at 4.
    assert_eq!(rec.columns, vec![1, 2, 3, 4, 5]);
}

#[test]
fn sequential_items_parse_one_at_a_time() {
    let mut parser = EventParser::new(Recorder::default());
    parser.update(&[0x01, 0x62, b'h', b'i']);
    parser.parse_some().unwrap();
    assert_eq!(parser.position(), 1);
    assert!(!parser.is_done());
    parser.parse_some().unwrap();
    assert!(parser.is_done());
    assert_eq!(
        parser.into_sink().events,
        vec![
            Event::Uint(1, TagKind::None),
            Event::Flush,
            Event::Str("hi".into(), TagKind::None),
            Event::Flush,
        ]
    );
}

#[test]
fn parse_to_end_rejects_trailing_bytes() {
    let mut parser = EventParser::new(Recorder::default());
    parser.update(&[0x00, 0x00]);
    let err = parser.parse_to_end().unwrap_err();
    assert_eq!(err.code, ErrorCode::TrailingBytes);
    assert_eq!(err.offset, 1);
}

#[test]
fn reset_rewinds_the_cursor() {
    let mut parser = EventParser::new(Recorder::default());
    parser.update(&[0x05]);
    parser.parse_some().unwrap();
    parser.reset();
    parser.parse_some().unwrap();
    assert_eq!(
        parser.into_sink().events,
        vec![
            Event::Uint(5, TagKind::None),
            Event::Flush,
            Event::Uint(5, TagKind::None),
            Event::Flush,
        ]
    );
}

#[test]
fn non_text_map_keys_are_refused() {
    let err = parse_err(&[0xa1, 0x01, 0x02]);
    assert_eq!(err.code, ErrorCode::MapKeyMustBeText);
    assert_eq!(err.offset, 1);

    let err = parse_err(&[0xbf, 0x01, 0x02, 0xff]);
    assert_eq!(err.code, ErrorCode::MapKeyMustBeText);
}

#[test]
fn break_outside_container_is_an_error() {
    assert_eq!(parse_err(&[0xff]).code, ErrorCode::SourceError);
    // Break between a key and its value.
    assert_eq!(
        parse_err(&[0xbf, 0x61, b'a', 0xff]).code,
        ErrorCode::SourceError
    );
}

#[test]
fn truncation_is_unexpected_eof() {
    for bytes in [&[][..], &[0x18], &[0x82, 0x01], &[0x7f, 0x61, b'a']] {
        assert_eq!(parse_err(bytes).code, ErrorCode::UnexpectedEof);
    }
}

#[test]
fn reserved_and_unsupported_heads() {
    assert_eq!(parse_err(&[0x1c]).code, ErrorCode::ReservedAdditionalInfo);
    assert_eq!(parse_err(&[0xfc]).code, ErrorCode::ReservedAdditionalInfo);
    assert_eq!(parse_err(&[0xf7]).code, ErrorCode::UnsupportedSimpleValue);
    assert_eq!(
        parse_err(&[0xf8, 0x20]).code,
        ErrorCode::UnsupportedSimpleValue
    );
}

#[test]
fn integer_overflow_aborts() {
    let err = parse_err(&[0x3b, 0x80, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(err.code, ErrorCode::NumberOutOfRange);
}

#[test]
fn depth_limit_applies_to_events() {
    let mut doc = vec![0x81u8; 4];
    doc.push(0x01);

    let mut parser =
        EventParser::with_limits(Recorder::default(), DecodeLimits::with_max_depth(4));
    parser.update(&doc);
    parser.parse_some().unwrap();

    let mut parser =
        EventParser::with_limits(Recorder::default(), DecodeLimits::with_max_depth(3));
    parser.update(&doc);
    let err = parser.parse_some().unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
}

#[test]
fn events_before_failure_are_kept() {
    let mut parser = EventParser::new(Recorder::default());
    parser.update(&[0x82, 0x01, 0x1c]);
    assert!(parser.parse_some().is_err());
    let rec = parser.into_sink();
    assert_eq!(
        rec.events,
        vec![Event::BeginArray(Some(2)), Event::Uint(1, TagKind::None)]
    );
}
