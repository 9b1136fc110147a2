use anyhow::Result;

use vrcshot_runtime::Config;

use crate::context::ExecutionContext;

pub fn handle(ctx: &ExecutionContext, refresh: bool) -> Result<()> {
    let config_path = Config::path_in(&ctx.data_dir);

    if config_path.exists() && !refresh {
        println!("Configuration already exists: {}", config_path.display());
        println!("Use --refresh to re-detect directories.");
        return Ok(());
    }

    let detected = Config::detect_defaults();
    let mut config = ctx.config.clone();

    // Detection fills gaps; explicit settings survive a refresh
    if config.log_dir.is_none() {
        config.log_dir = detected.log_dir;
    }
    if config.photo_dir.is_none() {
        config.photo_dir = detected.photo_dir;
    }
    if config.scan_batch_size == 0 {
        config.scan_batch_size = detected.scan_batch_size;
    }

    config.save(&ctx.data_dir)?;

    println!("Wrote {}", config_path.display());
    match &config.log_dir {
        Some(dir) => println!("  log_dir   = {}", dir.display()),
        None => println!("  log_dir   = (not found; set it in config.toml)"),
    }
    match &config.photo_dir {
        Some(dir) => println!("  photo_dir = {}", dir.display()),
        None => println!("  photo_dir = (not found; set it in config.toml)"),
    }
    Ok(())
}
