//! Fuzz target for shift-code classification.

#![no_main]

use libfuzzer_sys::fuzz_target;
use shiftguard::inference::ShiftClassifier;

fuzz_target!(|data: &[u8]| {
    if let Ok(code) = std::str::from_utf8(data) {
        let classifier = ShiftClassifier::default();
        let kind = classifier.classify(code);
        assert_eq!(kind, classifier.classify(code));
        assert_eq!(kind, classifier.classify(&format!(" {} ", code)));
    }
});
