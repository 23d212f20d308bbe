use psx_tim::{TimTexture, VramAtlas};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <input.tim>... ", args[0]);
        println!("\nExample: composite TIM textures into atlas.png");
        return;
    }

    let mut atlas = VramAtlas::new();
    for path in &args[1..] {
        match TimTexture::from_file(path) {
            Ok(tim) => {
                println!(
                    "✓ Loaded {path}: {}x{} at framebuffer ({}, {})",
                    tim.width(),
                    tim.height(),
                    tim.pixels.fb_x,
                    tim.pixels.fb_y
                );
                if let Err(e) = atlas.composite(&tim) {
                    eprintln!("✗ Failed to composite {path}: {e}");
                }
            }
            Err(e) => eprintln!("✗ Failed to load {path}: {e}"),
        }
    }

    match atlas.into_image().save("atlas.png") {
        Ok(()) => println!("✓ Saved as: atlas.png"),
        Err(e) => eprintln!("✗ Failed to save atlas: {e}"),
    }
}
