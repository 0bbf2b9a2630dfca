use std::error::Error;

use clap::Parser;

use crate::cli::Args;

mod cli;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    lantern::init_logger();

    lantern::run(args.width, args.height, args.frames, args.settings(), &args.output)
}
