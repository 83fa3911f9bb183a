#![no_main]

use libfuzzer_sys::fuzz_target;

use arbor_cbor::{DecodeLimits, EventParser, EventSink, Position};

#[derive(Default)]
struct BalanceSink {
    depth: usize,
}

impl EventSink for BalanceSink {
    fn begin_array(&mut self, _len: Option<usize>, _pos: Position) {
        self.depth += 1;
    }

    fn end_array(&mut self, _pos: Position) {
        assert!(self.depth > 0);
        self.depth -= 1;
    }

    fn begin_map(&mut self, _len: Option<usize>, _pos: Position) {
        self.depth += 1;
    }

    fn end_map(&mut self, _pos: Position) {
        assert!(self.depth > 0);
        self.depth -= 1;
    }

    fn flush(&mut self) {
        assert_eq!(self.depth, 0);
    }
}

fuzz_target!(|data: &[u8]| {
    let mut parser =
        EventParser::with_limits(BalanceSink::default(), DecodeLimits::with_max_depth(64));
    parser.update(data);
    if parser.parse_some().is_ok() {
        assert!(parser.position() <= data.len());
    }
});
