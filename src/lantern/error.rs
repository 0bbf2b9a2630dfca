use thiserror::Error;

/// 렌더 호출 전에 걸러지는 호출자 쪽 전제 조건 위반들.
/// 어떤 변형이든 반환되면 버퍼와 프레임 카운터는 건드리지 않은 상태.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("render called before the first resize: no buffers allocated")]
    NotResized,

    #[error("sphere {sphere} uses material {index}, but the scene only has {materials} materials")]
    InvalidMaterialIndex {
        sphere: usize,
        index: usize,
        materials: usize,
    },

    #[error("camera provides {actual} ray directions, renderer expects {expected}")]
    CameraMismatch { expected: usize, actual: usize },
}
