use nalgebra::Vector3;
use rand::Rng;

/// 바운스 방향을 흔들 때 쓰는 난수 공급원.
/// 적분기는 어떤 전략인지 모르고 이 트레이트만 씀.
pub trait Sampler {
    /// 새 바운스를 시작할 때 불림. 카운터 기반 해시는 여기서 시드를 밀어줌.
    fn begin_bounce(&mut self, _bounce: u32) {}

    /// 길이 1인 무작위 방향 벡터
    fn in_unit_sphere(&mut self) -> Vector3<f32>;
}

/// PCG 해시. 상태 없이 입력 하나로 다음 값을 만듦.
pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747796405).wrapping_add(2891336453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277803737);
    (word >> 22) ^ word
}

/// 시드를 한 번 해시하고 [0, 1] 범위 실수로 바꿈. 시드는 호출자가 들고 다님.
pub fn random_float(seed: &mut u32) -> f32 {
    *seed = pcg_hash(*seed);
    *seed as f32 / u32::MAX as f32
}

pub fn in_unit_sphere(seed: &mut u32) -> Vector3<f32> {
    let x = random_float(seed) * 2.0 - 1.0;
    let y = random_float(seed) * 2.0 - 1.0;
    let z = random_float(seed) * 2.0 - 1.0;
    normalize_or_up(Vector3::new(x, y, z))
}

// 세 값이 모두 0에 가까우면 정규화가 NaN을 만드니 위쪽 방향으로 대체
fn normalize_or_up(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::y)
}

/// 빠른 모드. 픽셀 인덱스와 프레임 번호만으로 결정되는 시드 흐름.
#[derive(Debug, Clone, Copy)]
pub struct HashSampler {
    seed: u32,
}

impl HashSampler {
    pub fn for_pixel(pixel_index: u32, frame_index: u32) -> Self {
        Self {
            seed: pixel_index.wrapping_mul(frame_index),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Sampler for HashSampler {
    fn begin_bounce(&mut self, bounce: u32) {
        self.seed = self.seed.wrapping_add(bounce);
    }

    fn in_unit_sphere(&mut self) -> Vector3<f32> {
        in_unit_sphere(&mut self.seed)
    }
}

/// 품질 모드. 밖에서 만들어 넘겨준 `rand` 생성기를 그대로 씀.
pub struct EntropySampler<R: Rng> {
    rng: R,
}

impl<R: Rng> EntropySampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Sampler for EntropySampler<R> {
    fn in_unit_sphere(&mut self) -> Vector3<f32> {
        let v = Vector3::new(
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
        );
        normalize_or_up(v)
    }
}
