#![no_main]

//! Grid text parser fuzzer.
//!
//! Any picture that parses must render back to the same text.

use labyrinth::Grid;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let lines: Vec<&str> = text.lines().collect();

    if let Some(grid) = Grid::from_rows(&lines) {
        let rendered = grid.to_rows();
        assert_eq!(rendered.len(), lines.len());
        for (original, back) in lines.iter().zip(&rendered) {
            assert_eq!(*original, back.as_str());
        }
    }
});
