#![no_main]

use libfuzzer_sys::fuzz_target;
use peppol_bridge::validate::{ValidationProfile, ValidatorRegistry};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let registry = ValidatorRegistry::new();
        let _ = registry.validate_all(s, ValidationProfile::PeppolBis3, None);
    }
});
