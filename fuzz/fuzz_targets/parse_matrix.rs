#![no_main]
use libfuzzer_sys::fuzz_target;
use voxelcore::Matrix4x4;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(m) = text.parse::<Matrix4x4<f64>>() {
            let _ = m.try_inverse();
            let _ = m.to_string().parse::<Matrix4x4<f64>>();
        }
    }
});
