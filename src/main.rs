use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{error, info};
use sdl2::keyboard::Keycode;

use softraster::display::{
    Display, InputEvent, MouseButtonKind, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use softraster::{
    config, BoundingBox, Canvas, Color, Geometry, Point, Ray, Rect, Scene, Shape, Style,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoMode {
    Gallery,
    Clock,
    Scene,
}

impl DemoMode {
    fn next(self, has_scene: bool) -> Self {
        match self {
            DemoMode::Gallery => DemoMode::Clock,
            DemoMode::Clock if has_scene => DemoMode::Scene,
            DemoMode::Clock | DemoMode::Scene => DemoMode::Gallery,
        }
    }
}

struct Args {
    width: u32,
    height: u32,
    vsync: bool,
    scene: Option<String>,
    anti_alias: bool,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        scene: None,
        anti_alias: true,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => parsed.vsync = false,
            "--no-aa" => parsed.anti_alias = false,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        parsed.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        parsed.height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    if let Some((w, h)) = args[i + 1].split_once('x') {
                        if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                            parsed.width = w;
                            parsed.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--scene" => {
                if i + 1 < args.len() {
                    parsed.scene = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: softraster [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!("  --scene PATH          Show a JSON scene file");
                println!("  --no-aa               Start with anti-aliasing off");
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            other => eprintln!("Ignoring unknown argument {:?}", other),
        }
        i += 1;
    }

    parsed
}

/// One of each shape, the row below spinning with time
fn draw_gallery(canvas: &mut Canvas, t: f32) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let cell = w / 4.0;
    let r = (cell.min(h / 2.0) * 0.35).max(4.0);
    let outline = Style::stroked(Color::WHITE, 2.0);

    canvas
        .circle(cell * 0.5, h * 0.25, r, &Style::filled(Color::RED).stroke(Color::WHITE).width(2.0))
        .rotated_ellipse(cell * 1.5, h * 0.25, r * 2.0, r, t * 30.0, &Style::filled(Color::CYAN))
        .rotated_round_rect(
            cell * 2.5,
            h * 0.25,
            r * 1.8,
            r * 1.2,
            r * 0.3,
            -t * 20.0,
            &Style::filled(Color::ORANGE).opacity(0.8),
        )
        .sector(
            cell * 3.5,
            h * 0.25,
            r,
            t * 45.0,
            t * 45.0 + 270.0,
            &Style::filled(Color::YELLOW).stroke(Color::DARK_GRAY).width(2.0),
        );

    // Pentagram: even-odd leaves the middle open
    let star: Vec<Point> = (0..5)
        .map(|k| {
            let a = (k as f32 * 144.0 - 90.0 + t * 10.0).to_radians();
            Point::new(cell * 0.5 + r * a.cos(), h * 0.7 + r * a.sin())
        })
        .collect();
    canvas.polygon(&star, &Style::filled(Color::MAGENTA));

    canvas.triangle(
        Point::new(cell * 1.5, h * 0.7 - r),
        Point::new(cell * 1.5 + r, h * 0.7 + r),
        Point::new(cell * 1.5 - r, h * 0.7 + r),
        &Style::filled(Color::GREEN).stroke(Color::WHITE).width(1.5),
    );

    let wave: Vec<Point> = (0..=32)
        .map(|k| {
            let x = cell * 2.1 + k as f32 * (cell * 0.8 / 32.0);
            Point::new(x, h * 0.7 + (k as f32 * 0.4 + t * 3.0).sin() * r * 0.6)
        })
        .collect();
    canvas.polyline(&wave, &Style::stroked(Color::LIGHT_BLUE, 3.0));

    let mut rect: Shape = Rect::new(cell * 3.5, h * 0.7, r * 1.5, r * 1.5, 0.0).into();
    rect.rotate_on_self(t * 60.0);
    canvas.draw(&rect, &outline);
}

/// Analog clock from rays; angles are degrees clockwise from 3 o'clock
fn draw_clock(canvas: &mut Canvas) {
    let center = Point::new(canvas.width() as f32 / 2.0, canvas.height() as f32 / 2.0);
    let radius = center.x.min(center.y) * 0.85;
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() % 86_400) as f32 + d.subsec_millis() as f32 / 1000.0)
        .unwrap_or_default();

    canvas.circle(
        center.x,
        center.y,
        radius,
        &Style::filled(Color::DARK_BLUE).stroke(Color::WHITE).width(4.0),
    );
    for tick in 0..12 {
        let mut mark = Ray::new(center, radius * 0.1, 0.0);
        mark.set_angle(tick as f32 * 30.0);
        mark.set_start(mark.start + (mark.end() - center) * 8.0);
        canvas.draw(&mark.into(), &Style::stroked(Color::WHITE, 3.0));
    }

    let hand = |fraction: f32, length: f32| Ray::new(center, radius * length, fraction * 360.0 - 90.0);
    let hours = hand((secs / 3600.0 % 12.0) / 12.0, 0.5);
    let minutes = hand((secs / 60.0 % 60.0) / 60.0, 0.75);
    let seconds = hand((secs % 60.0) / 60.0, 0.9);
    canvas
        .sector(
            center.x,
            center.y,
            radius * 0.95,
            -90.0,
            (secs % 60.0) * 6.0 - 90.0,
            &Style::filled(Color::RED.with_alpha(48)),
        )
        .draw(&hours.into(), &Style::stroked(Color::WHITE, 8.0))
        .draw(&minutes.into(), &Style::stroked(Color::LIGHT_GRAY, 5.0))
        .draw(&seconds.into(), &Style::stroked(Color::RED, 2.0))
        .circle(center.x, center.y, 6.0, &Style::filled(Color::RED));
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();
    config::detect_capabilities();
    config::set_anti_aliasing(args.anti_alias);

    let scene = match &args.scene {
        Some(path) => match Scene::load(path) {
            Ok(scene) => Some(scene),
            Err(e) => {
                error!("failed to load scene {}: {}", path, e);
                None
            },
        },
        None => None,
    };

    let (width, height) = (args.width, args.height);
    let (mut display, texture_creator) = Display::with_options("softraster", width, height, args.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut canvas = Canvas::new(width, height, Color::BLACK);
    let mut mode = if scene.is_some() {
        DemoMode::Scene
    } else {
        DemoMode::Gallery
    };

    info!("softraster demo {}x{}, vsync {}", width, height, args.vsync);
    println!("Controls:");
    println!("  Space   - Next demo");
    println!("  A       - Toggle anti-aliasing");
    println!("  Click   - Select a scene item (right click clears)");
    println!("  Escape  - Quit");

    let start = Instant::now();
    let mut selected: Option<BoundingBox> = None;
    'main: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::Space) => mode = mode.next(scene.is_some()),
                InputEvent::KeyDown(Keycode::A) => {
                    let enabled = !config::anti_aliasing();
                    config::set_anti_aliasing(enabled);
                    info!("anti-aliasing {}", if enabled { "on" } else { "off" });
                },
                InputEvent::MouseDown { x, y, button } => match (mode, &scene, button) {
                    (DemoMode::Scene, Some(scene), MouseButtonKind::Left) => {
                        // Scene is drawn centered, clipped to the window
                        let left = (width as i32 - scene.width.min(width) as i32) / 2;
                        let top = (height as i32 - scene.height.min(height) as i32) / 2;
                        selected = scene
                            .item_at((x - left) as f32, (y - top) as f32)
                            .map(|item| item.shape.bounding_box());
                    },
                    (_, _, MouseButtonKind::Right) => selected = None,
                    _ => {},
                },
                _ => {},
            }
        }

        let t = start.elapsed().as_secs_f32();
        match (mode, &scene) {
            (DemoMode::Scene, Some(scene)) => {
                let mut rendered = scene.render();
                if let Some(bb) = selected {
                    rendered.rect(
                        bb.x - 2.0,
                        bb.y - 2.0,
                        bb.width + 4.0,
                        bb.height + 4.0,
                        &Style::stroked(Color::YELLOW, 1.5),
                    );
                }
                display.present_centered(&mut target, rendered.buffer())?;
            },
            (DemoMode::Clock, _) => {
                canvas.clear(Color::BLACK);
                draw_clock(&mut canvas);
                display.present(&mut target, canvas.buffer())?;
            },
            _ => {
                canvas.clear(Color::rgb(24, 24, 32));
                draw_gallery(&mut canvas, t);
                display.present(&mut target, canvas.buffer())?;
            },
        }
    }

    Ok(())
}
