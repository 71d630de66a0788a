#![no_main]

use libfuzzer_sys::fuzz_target;
use mixguard_core::config::MixguardConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = MixguardConfig::parse(content) {
            let _ = config.validate();
        }
    }
});
