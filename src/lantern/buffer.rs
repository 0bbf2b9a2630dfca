use std::path::Path;

use bytemuck::cast_slice;
use image::{ImageFormat, ImageResult, Rgba, RgbaImage};
use nalgebra::Vector4;
use rayon::prelude::*;

/// 렌더러가 독점하는 두 버퍼. 누적 버퍼는 선형 색상의 합, 출력 버퍼는 8비트 RGBA.
/// 두 버퍼 모두 `width * height` 크기이고 `x + y * width`로 접근함.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    accumulation: Vec<Vector4<f32>>,
    display: Vec<[u8; 4]>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            accumulation: vec![Vector4::zeros(); pixels],
            display: vec![[0; 4]; pixels],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.display.len()
    }

    pub fn clear_accumulation(&mut self) {
        self.accumulation.fill(Vector4::zeros());
    }

    /// 한 줄씩 병렬로 나눠줌. 각 줄은 서로 겹치지 않으니 잠금 없이 쓸 수 있음.
    /// 너비가 0이면 `par_chunks_mut`가 터지니 호출 전에 걸러야 함.
    pub(crate) fn par_rows_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = (usize, (&mut [Vector4<f32>], &mut [[u8; 4]]))> + '_
    {
        let width = self.width as usize;
        self.accumulation
            .par_chunks_mut(width)
            .zip(self.display.par_chunks_mut(width))
            .enumerate()
    }

    pub fn accumulated(&self, x: u32, y: u32) -> Vector4<f32> {
        self.accumulation[self.index(x, y)]
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.display[self.index(x, y)]
    }

    /// 출력 표면에 그대로 넘길 R, G, B, A 바이트 배열
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.display)
    }

    // 버퍼의 0번째 줄은 화면 아래쪽이라 이미지로 옮길 때 뒤집어야 함
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(self.pixel(x, self.height - 1 - y))
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_image().save_with_format(path, ImageFormat::Png)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_zeroed_and_sized() {
        let buffer = FrameBuffer::new(4, 3);
        assert_eq!(buffer.size(), (4, 3));
        assert_eq!(buffer.pixel_count(), 12);
        assert_eq!(buffer.as_bytes().len(), 48);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buffer.accumulated(3, 2), Vector4::zeros());
    }

    #[test]
    fn rows_partition_the_buffer() {
        let mut buffer = FrameBuffer::new(3, 2);
        buffer.par_rows_mut().for_each(|(y, (acc, display))| {
            for (x, (slot, out)) in acc.iter_mut().zip(display.iter_mut()).enumerate() {
                *slot = Vector4::repeat((x + y * 3) as f32);
                *out = [x as u8, y as u8, 0, 255];
            }
        });

        assert_eq!(buffer.accumulated(2, 1), Vector4::repeat(5.0));
        assert_eq!(buffer.pixel(1, 1), [1, 1, 0, 255]);
        assert_eq!(&buffer.as_bytes()[4..8], &[1, 0, 0, 255]);

        buffer.clear_accumulation();
        assert_eq!(buffer.accumulated(2, 1), Vector4::zeros());
        // 출력 버퍼는 그대로
        assert_eq!(buffer.pixel(1, 1), [1, 1, 0, 255]);
    }

    #[test]
    fn image_is_flipped_vertically() {
        let mut buffer = FrameBuffer::new(1, 2);
        buffer.par_rows_mut().for_each(|(y, (_, display))| {
            display[0] = [y as u8 * 100, 0, 0, 255];
        });

        let image = buffer.to_image();
        assert_eq!(image.get_pixel(0, 0).0, [100, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 0, 255]);
    }
}
