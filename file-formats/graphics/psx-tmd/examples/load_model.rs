use psx_tmd::{DatFile, MeshPose, TmdModel, VdfFile, primitive};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <model.tmd> [anim.vdf anim.dat]", args[0]);
        println!("\nExample: inspect a TMD model, optionally posing frame 0 of an animation");
        return;
    }

    let model = match TmdModel::from_file(&args[1]) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("✗ Failed to load {}: {e}", args[1]);
            return;
        }
    };

    println!("✓ Loaded {}: {} objects", args[1], model.object_count());
    for (index, object) in model.objects().iter().enumerate() {
        match object.work_primitives() {
            Ok(primitives) => {
                let ok = primitive::valid(&primitives).count();
                println!(
                    "  object {index}: {} vertices, {} normals, {ok}/{} primitives decoded, scale {}",
                    object.vertices().len(),
                    object.normals().len(),
                    primitives.len(),
                    object.scale()
                );
            }
            Err(e) => eprintln!("  object {index}: ✗ {e}"),
        }
    }

    if args.len() >= 4 {
        let result = VdfFile::from_file(&args[2]).and_then(|vdf| {
            let dat = DatFile::from_file(&args[3])?;
            let mut pose = MeshPose::new(&model);
            pose.apply_frame(&vdf, &dat, 0.0)?;
            Ok((vdf, dat))
        });
        match result {
            Ok((vdf, dat)) => println!(
                "✓ Posed frame 0: {} keys over {} frames",
                vdf.key_count(),
                dat.frame_count()
            ),
            Err(e) => eprintln!("✗ Failed to pose animation: {e}"),
        }
    }
}
