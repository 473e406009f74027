use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::options::RenderOptions;
use crate::pipeline::renderer::{FrameStats, Renderer};
use crate::scene::camera::CameraInput;
use crate::scene::context::RenderContext;
use crate::scene::loader::{demo_scene, init_scene_resources};
use crate::ui::input::{CameraController, poll_toggles};
use log::{debug, error, info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::Instant;

/// Builds the scene from the configured meshes, or the built-in demo when
/// asked for or when nothing is configured.
pub fn load_context(config: &Config, demo: bool) -> Result<RenderContext, String> {
    if demo || config.meshes.is_empty() {
        if !demo {
            info!("No meshes configured, using the demo scene");
        }
        demo_scene(config)
    } else {
        init_scene_resources(config)
    }
}

/// Runs the application in GUI mode with real-time rendering and interactivity.
pub fn run_gui(mut config: Config, config_path: Option<&str>, demo: bool) -> Result<(), String> {
    let width = config.render.width;
    let height = config.render.height;

    info!("Starting GUI mode ({}x{})...", width, height);
    info!("Controls: WASD/Arrows=Move, LeftShift=Fast, RightDrag=Look, LeftDrag=Yaw+Dolly, BothDrag=Up/Down");
    info!(
        "F2=Rotate F3=Fire F4=Sampler F5=Shading F6=NormalMap F7=Depth F10=Background F11=FPS P=Screenshot R=Reload"
    );

    // 1. Initialize Window
    let mut window = Window::new(
        "Dual Rasterizer",
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| format!("Failed to create window: {}", e))?;
    window.set_target_fps(60);

    // 2. Initialize Resources
    let mut context = load_context(&config, demo)?;
    let mut options = RenderOptions::from_config(&config);
    let mut renderer = Renderer::new(width, height, config.render.bounding_box_margin);
    let mut controller = CameraController::new(config.camera.look_sensitivity);
    info!("{}", options.describe());

    let mut log_fps = false;
    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();
    let mut last_frame_time = Instant::now();

    // 3. Main Loop
    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        // --- Hot Reloading ---
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            match config_path {
                Some(path) => {
                    info!("Reloading configuration...");
                    match Config::load(path) {
                        Ok(new_config) => {
                            if (new_config.render.width, new_config.render.height) != (width, height) {
                                warn!("Resolution changes need a restart; keeping {}x{}", width, height);
                            }
                            config.render = new_config.render;
                            config.lighting = new_config.lighting;
                            options = RenderOptions::from_config(&config);
                            renderer.rasterizer.margin = config.render.bounding_box_margin.max(0.0);
                            info!("Hot reload successful! {}", options.describe());
                        }
                        Err(e) => warn!("Failed to reload config: {}", e),
                    }
                }
                None => warn!("No config file to reload"),
            }
        }

        // --- Toggles ---
        for toggle in poll_toggles(&window) {
            options = options.apply(toggle);
            info!("{:?} toggled: {}", toggle, options.describe());
        }
        if window.is_key_pressed(Key::F11, KeyRepeat::No) {
            log_fps = !log_fps;
            frame_count = 0;
            last_fps_update = Instant::now();
            info!("FPS logging: {}", log_fps);
        }

        // --- Update & Render ---
        let input = controller.poll(&window);
        context.update(dt, &input, &options);
        let stats = renderer.render(&mut context, &options);
        debug!("{:?}", stats);

        // --- Screenshot ---
        if window.is_key_pressed(Key::P, KeyRepeat::No) {
            let path = chrono::Local::now()
                .format("screenshot_%Y%m%d_%H%M%S.png")
                .to_string();
            match save_buffer_to_image(renderer.framebuffer.pixels(), width, height, &path) {
                Ok(()) => info!("Screenshot saved to '{}'", path),
                Err(e) => error!("{}", e),
            }
        }

        // --- Display ---
        window
            .update_with_buffer(renderer.framebuffer.pixels(), width, height)
            .map_err(|e| format!("Failed to present frame: {}", e))?;

        frame_count += 1;
        if log_fps && last_fps_update.elapsed().as_secs_f32() >= 2.0 {
            info!(
                "Average FPS: {:.1}",
                frame_count as f32 / last_fps_update.elapsed().as_secs_f32()
            );
            frame_count = 0;
            last_fps_update = Instant::now();
        }
    }

    Ok(())
}

/// Runs the application in CLI mode (headless): renders the configured
/// number of frames at a fixed timestep and saves the last one.
pub fn run_cli(config: &Config, demo: bool) -> Result<FrameStats, String> {
    info!("Starting CLI mode...");
    let mut context = load_context(config, demo)?;
    let options = RenderOptions::from_config(config);
    let mut renderer = Renderer::new(
        config.render.width,
        config.render.height,
        config.render.bounding_box_margin,
    );
    if !renderer.is_initialized() {
        return Err(format!(
            "Invalid render target {}x{}",
            config.render.width, config.render.height
        ));
    }

    let start_time = Instant::now();
    let mut stats = FrameStats::default();
    for _ in 0..config.render.frames.max(1) {
        context.update(config.render.fixed_timestep, &CameraInput::default(), &options);
        stats = renderer.render(&mut context, &options);
        debug!("{:?}", stats);
    }
    info!(
        "Rendered {} frame(s) in {:.2?}: {} triangles, {} culled, {} pixels",
        config.render.frames.max(1),
        start_time.elapsed(),
        stats.triangles,
        stats.culled,
        stats.pixels
    );

    info!("Saving output to '{}'...", config.render.output);
    save_buffer_to_image(
        renderer.framebuffer.pixels(),
        config.render.width,
        config.render.height,
        &config.render.output,
    )?;
    info!("Done.");
    Ok(stats)
}
