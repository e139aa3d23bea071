#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use phonefield_number::{MetadataParser, PhoneNumberParser, RegionCode};

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    region: Option<[u8; 2]>,
}

fuzz_target!(|input: Input| {
    let region = input.region.and_then(|b| {
        std::str::from_utf8(&b)
            .ok()
            .and_then(|s| s.parse::<RegionCode>().ok())
    });
    let first = MetadataParser.parse(&input.text, region);
    assert_eq!(first, MetadataParser.parse(&input.text, region));
    if let Ok(number) = first {
        assert!(!number.national_number.is_empty());
        assert!(number.national_number.bytes().all(|b| b.is_ascii_digit()));
        // International form of a result always parses without a region.
        assert!(MetadataParser.parse(&number.canonical(), None).is_ok());
    }
});
