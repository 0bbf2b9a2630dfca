use nalgebra::Vector4;

/// 선형 색상을 [0, 1]로 자르고 채널당 8비트로 양자화. 순서는 R, G, B, A.
/// NaN은 0으로 떨어짐.
pub fn vec4_to_rgba(color: &Vector4<f32>) -> [u8; 4] {
    let clamped = color.map(|channel| channel.clamp(0.0, 1.0));
    [
        (clamped.x * 255.0) as u8,
        (clamped.y * 255.0) as u8,
        (clamped.z * 255.0) as u8,
        (clamped.w * 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_quantizes() {
        let color = Vector4::new(2.0, -1.0, 0.5, 1.0);
        assert_eq!(vec4_to_rgba(&color), [255, 0, 127, 255]);
    }

    #[test]
    fn nan_becomes_black() {
        let color = Vector4::new(f32::NAN, 0.0, 0.0, 1.0);
        assert_eq!(vec4_to_rgba(&color), [0, 0, 0, 255]);
    }
}
