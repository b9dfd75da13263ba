//! Fuzz target for the command tokenizer.
//!
//! Run with: cargo +nightly fuzz run fuzz_tokenizer
//!
//! Tokenizes arbitrary text (escapes, stray quotes, multi-byte characters),
//! resolves every token, then takes whatever is left as one token. Every
//! advance must consume input, so the loop is bounded by the input length.

#![no_main]

use libfuzzer_sys::fuzz_target;
use suggestbot_core::{CommandRegistry, DEFAULT_PREFIX, Tokenizer};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let registry = CommandRegistry::new();
    let (prefix, body) = text.split_once('\n').unwrap_or((DEFAULT_PREFIX, text));

    let mut tokenizer = Tokenizer::new(body, prefix);
    let mut steps = 0;
    while tokenizer.has_more() {
        steps += 1;
        assert!(steps <= body.len() + 1, "tokenizer stopped consuming input");
        if let Ok(token) = tokenizer.advance() {
            let _ = token.resolve(&registry);
        }
    }

    let mut rest = Tokenizer::new(body, prefix);
    let _ = rest.advance();
    let _ = rest.remaining_as_token();
    assert!(rest.remaining().is_empty());
});
