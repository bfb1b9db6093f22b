#![no_main]
use libfuzzer_sys::fuzz_target;
use voxelcore::NiftiQform;

fuzz_target!(|data: &[u8]| {
    if data.len() < 58 {
        return;
    }
    let f = |i: usize| f32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
    let mut pixdim = [0f32; 8];
    for (n, p) in pixdim.iter_mut().enumerate() {
        *p = f(26 + 4 * n);
    }
    let qform = NiftiQform {
        qform_code: i16::from_le_bytes([data[0], data[1]]),
        quatern_b: f(2),
        quatern_c: f(6),
        quatern_d: f(10),
        quatern_x: f(14),
        quatern_y: f(18),
        quatern_z: f(22),
        pixdim,
    };
    let _ = qform.affine([4, 4, 4]);
    if let Ok(orientation) = qform.to_orientation() {
        let _ = orientation.world_to_voxel(orientation.voxel_to_world([1., 2., 3.]));
        let _ = orientation.to_qform();
    }
});
