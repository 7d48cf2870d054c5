// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use gemtext2latex_core::{convert, ParseConfig, RenderConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let plain = ParseConfig::default();
    let styled = ParseConfig {
        italics_delimiter: Some('*'),
        base_url: Some("gemini://example.org/dir/index.gmi".to_string()),
    };

    for config in [plain, styled] {
        // Conversion is total for any valid base
        let output = convert(input, &config, &RenderConfig::default()).unwrap();
        assert!(output.starts_with("\\documentclass{mk-plain}\n"));
    }
});
