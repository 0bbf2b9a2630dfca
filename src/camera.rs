use nalgebra::{Isometry3, Perspective3, Point3, Unit, Vector2, Vector3};
use rayon::prelude::*;

/// 렌더러가 읽어 가는 카메라. 눈 위치와 픽셀마다 미리 계산된 광선 방향 표(`x + y * width`)를 가짐.
/// 마우스, 키보드 입력 처리는 바깥 쉘의 몫이고 여기서는 `set_view`만 받음.
pub struct Camera {
    projection: Perspective3<f32>,
    view: Isometry3<f32>,

    vertical_fov: f32,
    near: f32,
    far: f32,

    position: Point3<f32>,
    forward: Unit<Vector3<f32>>,

    rays: Vec<Vector3<f32>>,

    width: u32,
    height: u32,
}

impl Camera {
    /// `vertical_fov`는 도 단위. (0, 0, 6)에서 -Z를 바라보며 시작함.
    pub fn new(vertical_fov: f32, near: f32, far: f32, width: u32, height: u32) -> Self {
        let position = Point3::new(0.0, 0.0, 6.0);
        let forward = Unit::new_unchecked(-Vector3::z());

        let mut to_return = Self {
            projection: Self::perspective(vertical_fov, near, far, width, height),
            view: Self::look(&position, &forward),
            vertical_fov,
            near,
            far,
            position,
            forward,
            rays: vec![],
            width,
            height,
        };

        to_return.reevaluate_rays();

        to_return
    }

    /// 이미 계산된 방향 표를 그대로 쓰는 카메라. 표 길이는 `width * height`여야 렌더러가 받아줌.
    pub fn from_rays(position: Point3<f32>, width: u32, height: u32, rays: Vec<Vector3<f32>>) -> Self {
        let forward = Unit::new_unchecked(-Vector3::z());
        Self {
            projection: Self::perspective(45.0, 0.1, 100.0, width, height),
            view: Self::look(&position, &forward),
            vertical_fov: 45.0,
            near: 0.1,
            far: 100.0,
            position,
            forward,
            rays,
            width,
            height,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn ray_directions(&self) -> &[Vector3<f32>] {
        &self.rays
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 크기가 같으면 아무것도 안 함. 바뀌었으면 투영과 광선 표를 다시 만들고 true.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }

        self.width = width;
        self.height = height;

        self.reevaluate_projection();
        self.reevaluate_rays();

        true
    }

    /// 카메라를 옮김. 호출한 쪽에서 렌더러의 프레임 카운터를 초기화해야 함.
    pub fn set_view(&mut self, position: Point3<f32>, forward: Vector3<f32>) {
        self.position = position;
        self.forward = Unit::new_normalize(forward);

        self.view = Self::look(&self.position, &self.forward);
        self.reevaluate_rays();
    }

    fn perspective(vertical_fov: f32, near: f32, far: f32, width: u32, height: u32) -> Perspective3<f32> {
        // 한 변이 0이면 종횡비를 못 구하니 1로 대체. 어차피 광선은 하나도 안 만듦
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        Perspective3::new(aspect, vertical_fov.to_radians(), near, far)
    }

    fn look(position: &Point3<f32>, forward: &Unit<Vector3<f32>>) -> Isometry3<f32> {
        let target = position + forward.into_inner();
        Isometry3::look_at_rh(position, &target, &Vector3::y_axis())
    }

    fn reevaluate_projection(&mut self) {
        self.projection = Self::perspective(self.vertical_fov, self.near, self.far, self.width, self.height);
    }

    fn reevaluate_rays(&mut self) {
        let width = self.width as usize;
        let height = self.height as usize;

        self.rays = (0..width * height)
            .into_par_iter()
            .map(|index| {
                let x = index % width;
                let y = index / width;

                // [-1, 1] 정규화 장치 좌표. y = 0 줄이 화면 아래쪽
                let mut coord = Vector2::new(x as f32 / width as f32, y as f32 / height as f32);
                coord *= 2.0;
                coord -= Vector2::new(1.0, 1.0);

                let target = self.projection.unproject_point(&Point3::new(coord.x, coord.y, 1.0));
                let normalized = target.coords.normalize();

                self.view.inverse_transform_vector(&normalized)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_table_matches_viewport() {
        let camera = Camera::new(45.0, 0.1, 100.0, 8, 4);
        assert_eq!(camera.ray_directions().len(), 32);
        for ray in camera.ray_directions() {
            assert!((ray.norm() - 1.0).abs() < 1e-4);
            // 전부 -Z 쪽을 향해야 함
            assert!(ray.z < 0.0);
        }
    }

    #[test]
    fn center_ray_looks_forward() {
        let camera = Camera::new(45.0, 0.1, 100.0, 2, 2);
        // (1, 1)은 정규화 좌표 (0, 0)
        let center = camera.ray_directions()[1 + 2];
        assert!((center - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn bottom_row_points_down() {
        let camera = Camera::new(45.0, 0.1, 100.0, 4, 4);
        assert!(camera.ray_directions()[0].y < 0.0);
        assert!(camera.ray_directions()[0].x < 0.0);
    }

    #[test]
    fn resize_is_noop_when_unchanged() {
        let mut camera = Camera::new(45.0, 0.1, 100.0, 4, 4);
        assert!(!camera.resize(4, 4));
        assert!(camera.resize(6, 2));
        assert_eq!(camera.size(), (6, 2));
        assert_eq!(camera.ray_directions().len(), 12);
    }

    #[test]
    fn zero_sized_viewport_has_no_rays() {
        let camera = Camera::new(45.0, 0.1, 100.0, 0, 0);
        assert!(camera.ray_directions().is_empty());
    }

    #[test]
    fn set_view_rotates_rays() {
        let mut camera = Camera::new(45.0, 0.1, 100.0, 2, 2);
        camera.set_view(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        let center = camera.ray_directions()[3];
        assert!((center - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-4);
        assert_eq!(camera.position(), Point3::origin());
    }
}
