#![no_main]

use libfuzzer_sys::fuzz_target;

use arbor_cbor::walk::item_end;
use arbor_cbor::DecodeLimits;

fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits::with_max_depth(64);
    if let Ok(end) = item_end(data, 0, limits) {
        assert!(end > 0 && end <= data.len());
        // The accepted range must re-walk to the same end.
        assert_eq!(item_end(&data[..end], 0, limits), Ok(end));
    }
});
