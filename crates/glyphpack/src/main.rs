use clap::Parser;
use glyphpack::{Args, Options, PipelineError, SubprocessRasterizer, run};
use glyphpack_atlas::TreePacker;

fn main() {
    let args = Args::parse();
    glyphpack_core::logging::init(args.verbose);

    let result = Options::from_args(args).map_err(PipelineError::from).and_then(|options| {
        let rasterizer = SubprocessRasterizer::new(&options.rasterizer);
        run(&options, &rasterizer, &TreePacker::default())
    });

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
