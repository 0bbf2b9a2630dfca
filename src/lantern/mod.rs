use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use nalgebra::{Point3, Unit, Vector3, Vector4};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::lantern::buffer::FrameBuffer;
use crate::lantern::error::RenderError;
use crate::lantern::random::{EntropySampler, HashSampler, Sampler};
use crate::lantern::ray::Ray;
use crate::lantern::scene::{Scene, Sphere};
use crate::util::vec4_to_rgba;

pub mod buffer;
pub mod error;
pub mod random;
pub mod ray;
pub mod scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomMode {
    /// 픽셀 인덱스와 프레임 번호로 정해지는 PCG 해시. 같은 입력이면 같은 그림.
    Fast,
    /// 프레임마다 새로 시드를 받는 `StdRng`. 느리지만 패턴이 덜 보임.
    Quality,
}

pub struct Settings {
    pub accumulate: bool,
    pub random: RandomMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accumulate: true,
            random: RandomMode::Fast,
        }
    }
}

pub struct Renderer {
    final_image: Option<FrameBuffer>,
    frame_index: u32,
    last_render_time: Duration,
    pub settings: Settings,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub const BOUNCE_LIMIT: u32 = 5;
    pub const SKY_COLOR: [f32; 3] = [0.6, 0.7, 0.9];
    pub const HIT_BIAS: f32 = 0.0001;

    /// 버퍼 없이 시작함. 첫 `on_resize` 전에 `render`를 부르면 에러.
    pub fn new() -> Self {
        Self {
            final_image: None,
            frame_index: 1,
            last_render_time: Duration::ZERO,
            settings: Default::default(),
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(image) = &self.final_image {
            if image.size() == (width, height) {
                return;
            }
        }

        debug!("resizing render target to {width}x{height}");

        // 예전 버퍼는 여기서 통째로 버려짐. 새 크기에서 누적을 처음부터 다시 시작
        self.final_image = Some(FrameBuffer::new(width, height));
        self.frame_index = 1;
    }

    pub fn reset_frame_index(&mut self) {
        debug!("accumulation reset after {} frames", self.frame_index - 1);
        self.frame_index = 1;
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn last_render_time(&self) -> Duration {
        self.last_render_time
    }

    /// 마지막 렌더 결과. 다음 `render`나 크기 변경 전까지만 유효함.
    pub fn final_image(&self) -> Option<&FrameBuffer> {
        self.final_image.as_ref()
    }

    /// 한 프레임을 그려서 누적 버퍼에 더하고 출력 버퍼를 갱신함.
    /// 전제 조건이 깨졌으면 아무것도 건드리지 않고 에러를 돌려줌.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        let Some(image) = self.final_image.as_mut() else {
            warn!("render requested before the first resize");
            return Err(RenderError::NotResized);
        };

        scene.validate()?;

        let expected = image.pixel_count();
        let actual = camera.ray_directions().len();
        if expected != actual {
            warn!("camera ray table has {actual} entries, render target has {expected} pixels");
            return Err(RenderError::CameraMismatch { expected, actual });
        }

        let start = Instant::now();

        if self.frame_index == 1 {
            image.clear_accumulation();
        }

        // 너비가 0이면 par_chunks_mut가 터지니 빈 화면은 건너뜀
        if expected > 0 {
            let width = image.size().0 as usize;
            let frame_index = self.frame_index;
            let origin = camera.position();
            let directions = camera.ray_directions();

            let frame_seed = match self.settings.random {
                RandomMode::Fast => None,
                RandomMode::Quality => Some(thread_rng().gen::<u64>()),
            };

            image
                .par_rows_mut()
                .for_each(|(y, (accumulation, display))| {
                    // 줄마다 자기 생성기를 가짐. 스레드끼리 상태를 나누지 않음
                    let mut entropy = frame_seed.map(|seed| {
                        EntropySampler::new(StdRng::seed_from_u64(seed.wrapping_add(y as u64)))
                    });

                    for (x, (slot, pixel)) in accumulation.iter_mut().zip(display.iter_mut()).enumerate() {
                        let index = x + y * width;
                        let ray = Ray::new(origin, directions[index]);

                        let color = match entropy.as_mut() {
                            Some(sampler) => Self::per_pixel(scene, &ray, sampler),
                            None => Self::per_pixel(
                                scene,
                                &ray,
                                &mut HashSampler::for_pixel(index as u32, frame_index),
                            ),
                        };

                        *slot += color;

                        let accumulated = *slot / frame_index as f32;
                        *pixel = vec4_to_rgba(&accumulated);
                    }
                });
        }

        self.last_render_time = start.elapsed();
        trace!(
            "frame {} rendered in {:.3}ms",
            self.frame_index,
            self.last_render_time.as_secs_f64() * 1000.0
        );

        if self.settings.accumulate {
            self.frame_index = self.frame_index.saturating_add(1);
        } else {
            self.frame_index = 1;
        }

        Ok(())
    }

    // DirectX의 RayGen 쉐이더와 같음
    /// 광선 하나의 밝기를 최대 `BOUNCE_LIMIT`번 튕기며 모음.
    /// `scene`은 `Scene::validate`를 통과한 상태여야 함.
    pub fn per_pixel<S: Sampler + ?Sized>(scene: &Scene, ray: &Ray, sampler: &mut S) -> Vector4<f32> {
        let mut ray = *ray;

        let mut light = Vector3::zeros();
        let mut throughput = Vector3::repeat(1.0);

        for bounce in 0..Self::BOUNCE_LIMIT {
            sampler.begin_bounce(bounce);

            let Some(HitPayload { position, normal, sphere, .. }) = Self::trace_ray(&ray, scene) else {
                light += Vector3::from(Self::SKY_COLOR).component_mul(&throughput);
                break;
            };

            let material = &scene.materials[sphere.material_index];
            light += material.emission().component_mul(&throughput);

            // metallic이 1이면 색을 거의 안 먹고 그대로 넘김
            throughput.component_mul_assign(&material.albedo.lerp(&Vector3::repeat(1.0), material.metallic));

            // position 자체가 구에 접하기 때문에 position을 다음 레이 트레이싱에 바로 사용하면 제대로 안할 것임.
            // 그래서 조금이라도 옮겨야 함
            ray.origin = position + normal.as_ref() * Self::HIT_BIAS;
            ray.direction = (normal.as_ref() + sampler.in_unit_sphere())
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(|| normal.into_inner());
        }

        Vector4::new(light.x, light.y, light.z, 1.0)
    }

    /// 양수 거리에서 가장 가까운 구를 찾음. 공간 분할 없이 전부 훑음.
    pub fn trace_ray<'a>(ray: &Ray, scene: &'a Scene) -> Option<HitPayload<'a>> {
        let mut closest: Option<(usize, &Sphere, f32)> = None;
        for (index, sphere) in scene.spheres.iter().enumerate() {
            // 반지름이 0 이하(또는 NaN)인 구는 맞을 수 없음
            if !(sphere.radius > 0.0) {
                continue;
            }

            // a = 빔 시작
            // b = 빔 방향
            // r = 구 반지름
            // t = 빔이 구와 만날 때, 그 빔 길이. 만나지 않으면 t는 정의되지 않음.
            // (bx^2 + by^2 + bz^2) * t^2 + 2 * (ax * bx + ay * by + az * bz) * t + (ax^2 + ay^2 + az^2 - r^2) = 0
            // 이 식은 구가 원점에 존재할 것을 가정하고 작성한 것. 구가 원점에 존재하지 않을 때는 그만큼 카메라 자체를 이동시켜 해결함.
            let origin = ray.origin - sphere.position;

            let first = ray.direction.norm_squared();
            let second = 2.0 * origin.dot(&ray.direction);
            let third = origin.norm_squared() - sphere.radius.powi(2);

            // 판별식
            let discriminant = second.powi(2) - 4.0 * first * third;
            if discriminant < 0.0 {
                continue;
            }

            // 방향 길이가 0이면 inf나 NaN이 나옴. 뒤쪽(0 이하)과 함께 걸러냄
            let distance = (-second - discriminant.sqrt()) / (2.0 * first);
            if !(distance.is_finite() && distance > 0.0) {
                continue;
            }

            match closest {
                Some((_, _, previous_distance)) if previous_distance <= distance => {}
                _ => closest = Some((index, sphere, distance)),
            }
        }

        closest.map(|(index, sphere, distance)| Self::closest_hit(ray, distance, index, sphere))
    }

    fn closest_hit<'a>(ray: &Ray, distance: f32, index: usize, sphere: &'a Sphere) -> HitPayload<'a> {
        let position = ray.at(distance);
        let normal = Unit::new_normalize(position - sphere.position);

        HitPayload {
            distance,
            position,
            normal,
            index,
            sphere,
        }
    }
}

// HitPayload는 빛의 경로에 대한 정보만 담고
// 이를 이용해 색상을 알아내는건 나중에 함
#[derive(Debug)]
pub struct HitPayload<'a> {
    pub distance: f32,
    pub position: Point3<f32>,
    pub normal: Unit<Vector3<f32>>,
    pub index: usize,
    pub sphere: &'a Sphere,
}
