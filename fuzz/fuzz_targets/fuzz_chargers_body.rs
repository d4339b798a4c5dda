#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary response bodies must parse or fail cleanly, never panic
    if let Ok(records) = chargeboard::fetch::parse_chargers_bytes(data) {
        for record in &records {
            let state = chargeboard::status::classify_record(record);
            let _ = state.css_class();
            let _ = chargeboard::status::payment_link("fuzz", &record.plug);
        }
    }
});
