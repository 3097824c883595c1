// Loads an image, builds its terrain and writes two files next to it:
// <name>_heights.png  elevation-coloured heightfield
// <name>_stats.txt    mesh summary
//
// cargo run -p heightmap --example heightfield_preview -- path/to/image.png

use std::env;
use std::fs;
use std::path::Path;

use heightmap::{load_terrain, preview};
use image::RgbImage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = env::args().nth(1) else {
        eprintln!("usage: heightfield_preview <image>");
        std::process::exit(2);
    };
    let input = Path::new(&input);
    let terrain = load_terrain(&fs::read(input)?)?;
    let hf = &terrain.heightfield;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "heightfield".into());
    let out_dir = input.parent().unwrap_or(Path::new("."));

    let colored = RgbImage::from_raw(hf.width(), hf.height(), preview::colorize(hf))
        .ok_or("colour buffer does not match image size")?;
    let png = out_dir.join(format!("{stem}_heights.png"));
    colored.save(&png)?;
    println!("Saved {}", png.display());

    let (lo, hi) = hf.min_max();
    let stats = format!(
        "size {}x{}\nvertices {}\ntriangles {}\nelevation {lo:.4}..{hi:.4}\n",
        hf.width(),
        hf.height(),
        terrain.mesh.vertex_count(),
        terrain.mesh.triangle_count(),
    );
    let txt = out_dir.join(format!("{stem}_stats.txt"));
    fs::write(&txt, stats)?;
    println!("Saved {}", txt.display());
    Ok(())
}
