use std::error::Error;
use std::path::Path;

use log::info;

pub mod camera;
pub mod lantern;
pub mod util;

pub use camera::Camera;
pub use lantern::buffer::FrameBuffer;
pub use lantern::error::RenderError;
pub use lantern::scene::{Material, Scene, Sphere};
pub use lantern::{RandomMode, Renderer, Settings};

/// `RUST_LOG`를 따르고 없으면 info 수준으로 로거 초기화
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

// 창 없이 돌리는 호스트. 기본 장면을 `frames`번 누적해서 PNG로 저장함
pub fn run<P: AsRef<Path>>(
    width: u32,
    height: u32,
    frames: u32,
    settings: Settings,
    output: P,
) -> Result<(), Box<dyn Error>> {
    let scene = Scene::default();
    let mut camera = Camera::new(45.0, 0.1, 100.0, width, height);
    let mut renderer = Renderer::new();
    renderer.settings = settings;

    renderer.on_resize(width, height);
    camera.resize(width, height);

    for _ in 0..frames {
        renderer.render(&scene, &camera)?;
    }

    info!(
        "rendered {frames} frames at {width}x{height}, frame index now {}, last frame took {:.3}ms",
        renderer.frame_index(),
        renderer.last_render_time().as_secs_f64() * 1000.0
    );

    if let Some(image) = renderer.final_image() {
        image.save_png(output.as_ref())?;
        info!("wrote {}", output.as_ref().display());
    }

    Ok(())
}
