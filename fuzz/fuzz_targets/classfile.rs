#![no_main]

use classscope::{disassemble_with, DisassemblyConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = disassemble_with(data, &DisassemblyConfig::full());
});
