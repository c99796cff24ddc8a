#![no_main]
use libfuzzer_sys::fuzz_target;
use savedump::{DecoderBuilder, InventoryPolicy, PlayerLayout, Reporter};

fuzz_target!(|data: &[u8]| {
    for layout in [PlayerLayout::Minimal, PlayerLayout::Extended] {
        let decoder = DecoderBuilder::new()
            .player_layout(layout)
            .inventory_policy(InventoryPolicy::All)
            .build();

        let records = match decoder.decode(data) {
            Ok(records) => records,
            Err(e) => {
                assert!(e.offset() <= data.len());
                e.into_records()
            }
        };

        for record in &records {
            assert!(record.offset <= data.len());
        }

        let mut out = Vec::new();
        Reporter::new(&mut out)
            .with_offsets(true)
            .write_records(&records)
            .unwrap();
    }
});
