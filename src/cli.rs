use std::path::PathBuf;

use clap::Parser;
use lantern::{RandomMode, Settings};

/// 창 없이 기본 장면을 누적 렌더링해서 PNG로 저장
#[derive(Parser, Debug)]
#[command(name = "lantern")]
#[command(about = "Progressive path tracer rendering the demo scene to a PNG")]
pub struct Args {
    /// Number of frames to render
    #[arg(default_value_t = 64)]
    pub frames: u32,

    /// Output PNG path
    #[arg(default_value = "lantern.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 450)]
    pub height: u32,

    /// Use the seeded `StdRng` instead of the per-pixel hash
    #[arg(long)]
    pub quality: bool,

    /// Show a single fresh sample per frame instead of averaging
    #[arg(long)]
    pub no_accumulate: bool,
}

impl Args {
    pub fn settings(&self) -> Settings {
        Settings {
            accumulate: !self.no_accumulate,
            random: if self.quality {
                RandomMode::Quality
            } else {
                RandomMode::Fast
            },
        }
    }
}
