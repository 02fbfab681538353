#![no_main]

use colony_defense::save::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding arbitrary text must never panic.
    let Ok(decoded) = decode(text) else {
        return;
    };

    let state = decoded.state;
    assert!(state.wave >= 1);
    assert!(state.colony.hp <= state.colony.max_hp);

    // A decoded state survives a second trip unchanged.
    let text = encode(&state, chrono::Local::now()).expect("re-encode");
    let again = decode(&text).expect("re-decode");
    assert!(again.warnings.is_empty());
    assert_eq!(again.state, state);
});
