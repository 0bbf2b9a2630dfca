use nalgebra::{Point3, Vector3};

/// 한 번의 바운스 동안만 쓰이는 광선. 방향은 정규화되어 있다고 가정하지만 강제하지는 않음.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_moves_along_direction() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, -1.0));
        let point = ray.at(2.5);
        assert_eq!(point, Point3::new(1.0, 2.0, 0.5));
    }
}
