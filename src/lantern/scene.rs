use nalgebra::{Point3, Vector3};

use crate::lantern::error::RenderError;

pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub materials: Vec<Material>,
}

impl Scene {
    pub fn empty() -> Self {
        Self {
            spheres: vec![],
            materials: vec![],
        }
    }

    /// 모든 구의 `material_index`가 `materials` 안을 가리키는지 확인.
    /// 렌더링 도중에는 인덱스를 다시 검사하지 않으니 렌더 전에 반드시 통과해야 함.
    pub fn validate(&self) -> Result<(), RenderError> {
        let materials = self.materials.len();
        match self
            .spheres
            .iter()
            .enumerate()
            .find(|(_, sphere)| sphere.material_index >= materials)
        {
            Some((sphere, invalid)) => Err(RenderError::InvalidMaterialIndex {
                sphere,
                index: invalid.material_index,
                materials,
            }),
            None => Ok(()),
        }
    }
}

// 분홍색 구, 빛나는 주황색 구, 그리고 바닥 역할을 하는 아주 큰 파란 구
impl Default for Scene {
    fn default() -> Self {
        let pink = Material {
            albedo: Vector3::new(1.0, 0.0, 1.0),
            roughness: 0.0,
            ..Default::default()
        };
        let blue = Material {
            albedo: Vector3::new(0.2, 0.3, 1.0),
            roughness: 0.1,
            ..Default::default()
        };
        let orange = Material {
            albedo: Vector3::new(0.8, 0.5, 0.2),
            roughness: 0.1,
            emission_color: Vector3::new(0.8, 0.5, 0.2),
            emission_power: 2.0,
            ..Default::default()
        };

        Self {
            spheres: vec![
                Sphere::new(Point3::origin(), 1.0, 0),
                Sphere::new(Point3::new(2.0, 0.0, 0.0), 1.0, 2),
                Sphere::new(Point3::new(0.0, -101.0, 0.0), 100.0, 1),
            ],
            materials: vec![pink, blue, orange],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sphere {
    pub position: Point3<f32>,
    pub radius: f32,
    pub material_index: usize,
}

impl Sphere {
    pub fn new(position: Point3<f32>, radius: f32, material_index: usize) -> Self {
        Self {
            position,
            radius,
            material_index,
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            radius: 1.0,
            material_index: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub albedo: Vector3<f32>,
    // 지금은 빛 전달에 영향 없음. 편집기에서만 쓰임
    pub roughness: f32,
    pub metallic: f32,
    pub emission_color: Vector3<f32>,
    pub emission_power: f32,
}

impl Material {
    pub fn emission(&self) -> Vector3<f32> {
        self.emission_color * self.emission_power
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vector3::new(1.0, 1.0, 1.0),
            roughness: 1.0,
            metallic: 0.0,
            emission_color: Vector3::zeros(),
            emission_power: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_is_valid() {
        let scene = Scene::default();
        assert_eq!(scene.spheres.len(), 3);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn emission_scales_color_by_power() {
        let material = Material {
            emission_color: Vector3::new(0.5, 0.25, 1.0),
            emission_power: 2.0,
            ..Default::default()
        };
        assert_eq!(material.emission(), Vector3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn validate_reports_first_bad_sphere() {
        let mut scene = Scene::default();
        scene.spheres[1].material_index = 7;

        match scene.validate() {
            Err(RenderError::InvalidMaterialIndex {
                sphere,
                index,
                materials,
            }) => {
                assert_eq!(sphere, 1);
                assert_eq!(index, 7);
                assert_eq!(materials, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_scene_is_valid() {
        assert!(Scene::empty().validate().is_ok());
    }
}
