//! Every sample driven through the full lifecycle on the headless backend

use sample_framework::gpu::GraphicsError;
use sample_framework::headless::{DeviceCommand, HeadlessDevice, HeadlessPlatform};
use sample_framework::prelude::*;
use sample_framework::window::ShellEvent;
use samples_app::contents::{
    FramebufferSample, HelloSample, InstancingSample, Transform3dSample, TransformSample,
    TriangleSample, INSTANCE_COUNT,
};
use std::rc::Rc;

fn run_frames<C: ContentModule>(
    config: SampleConfig,
    content: C,
    platform: HeadlessPlatform,
) -> (Rc<HeadlessDevice>, Sample<C>) {
    let device = platform.device();
    let mut sample = Sample::new(config, Box::new(platform), content);
    sample.init().expect("init");
    let reason = sample.run().expect("run");
    assert_eq!(reason, ExitReason::WindowClosed);
    sample.destroy();
    (device, sample)
}

fn assert_no_leaks(device: &HeadlessDevice) {
    let live = device.live_resources();
    assert_eq!(live.total(), 0, "leaked resources: {live:?}");
}

fn creates(device: &HeadlessDevice, kind: ResourceKind) -> Vec<u32> {
    device
        .commands()
        .into_iter()
        .filter_map(|command| match command {
            DeviceCommand::Create { kind: k, id } if k == kind => Some(id),
            _ => None,
        })
        .collect()
}

#[test]
fn test_hello_opens_and_closes_without_gpu_objects() {
    let platform = HeadlessPlatform::new().close_after_frames(3);
    let stats = platform.stats();
    let (device, sample) = run_frames(HelloSample::config(), HelloSample, platform);

    assert_eq!(sample.state(), SampleState::Destroyed);
    assert_eq!(sample.frames(), 3);
    assert_eq!(stats.opened(), 1);
    assert_eq!(stats.closed(), 1);
    assert_eq!(stats.swaps(), 3);
    assert_eq!(device.draw_calls(), 0);
    assert!(device
        .commands()
        .iter()
        .all(|command| !matches!(command, DeviceCommand::Create { .. })));
}

#[test]
fn test_every_sample_releases_what_it_allocates() {
    fn check<C: ContentModule>(config: SampleConfig, content: C) {
        let title = config.window.title.clone();
        let platform = HeadlessPlatform::new().close_after_frames(2);
        let (device, _) = run_frames(config, content, platform);
        assert!(device.draw_calls() > 0, "{title} never drew");
        assert_no_leaks(&device);
    }

    check(TriangleSample::config(), TriangleSample::default());
    check(TransformSample::config(), TransformSample::default());
    check(Transform3dSample::config(), Transform3dSample::default());
    check(InstancingSample::config(), InstancingSample::default());
    check(FramebufferSample::config(), FramebufferSample::default());
}

#[test]
fn test_triangle_draws_once_per_frame() {
    let (device, _) = run_frames(
        TriangleSample::config(),
        TriangleSample::default(),
        HeadlessPlatform::new().close_after_frames(4),
    );

    let commands = device.commands();
    assert!(commands.contains(&DeviceCommand::ClearColor([0.0, 0.0, 0.3, 0.0])));
    assert_eq!(device.draw_calls(), 4);
    assert!(commands
        .iter()
        .filter(|command| command.is_draw())
        .all(|command| *command == DeviceCommand::DrawArrays { first: 0, count: 3 }));
}

#[test]
fn test_transform_uploads_model_matrix_each_frame() {
    let (device, sample) = run_frames(
        TransformSample::config(),
        TransformSample::default(),
        HeadlessPlatform::new().close_after_frames(3),
    );

    let uploads = device
        .commands()
        .iter()
        .filter(|command| matches!(command, DeviceCommand::UniformMat4 { .. }))
        .count();
    assert_eq!(uploads, 3);
    assert!(sample.content().elapsed() >= 0.0);
}

#[test]
fn test_instancing_rewrites_every_transform_per_frame() {
    let (device, _) = run_frames(
        InstancingSample::config(),
        InstancingSample::default(),
        HeadlessPlatform::new().close_after_frames(3),
    );
    let commands = device.commands();

    let writes: Vec<&Vec<u8>> = commands
        .iter()
        .filter_map(|command| match command {
            DeviceCommand::WriteBuffer {
                target: BufferTarget::Texture,
                offset: 0,
                data,
            } => Some(data),
            _ => None,
        })
        .collect();
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|data| data.len() == INSTANCE_COUNT * 16 * 4));

    // Instance i is translated to (0, i, 0): column 3, row 1 of matrix i
    let first = writes[0];
    for instance in 0..INSTANCE_COUNT {
        let start = (instance * 16 + 13) * 4;
        let bytes = [first[start], first[start + 1], first[start + 2], first[start + 3]];
        let y = f32::from_le_bytes(bytes);
        assert!((y - instance as f32).abs() < 1e-6);
    }

    let buffer = creates(&device, ResourceKind::Buffer);
    assert!(commands.iter().any(|command| matches!(
        command,
        DeviceCommand::TextureBuffer(id) if buffer.contains(id)
    )));
    assert!(commands
        .iter()
        .any(|command| matches!(command, DeviceCommand::UniformI32 { value: 0, .. })));
    let instanced = DeviceCommand::DrawArraysInstanced {
        first: 0,
        count: 3,
        instances: INSTANCE_COUNT as i32,
    };
    assert!(commands
        .iter()
        .filter(|command| command.is_draw())
        .all(|command| *command == instanced));
}

#[test]
fn test_instancing_surfaces_mapping_failure() {
    let platform = HeadlessPlatform::new().close_after_frames(3);
    let device = platform.device();
    let mut sample =
        Sample::new(InstancingSample::config(), Box::new(platform), InstancingSample::default());
    sample.init().expect("init");
    device.fail_mapping();

    assert!(matches!(sample.run(), Err(SampleError::Graphics(_))));
    sample.destroy();
    assert_no_leaks(&device);
}

#[test]
fn test_framebuffer_draws_offscreen_before_blitting() {
    let (device, _) = run_frames(
        FramebufferSample::config(),
        FramebufferSample::default(),
        HeadlessPlatform::new().close_after_frames(1),
    );
    let fbo = creates(&device, ResourceKind::Framebuffer)[0];
    let commands = device.commands();
    let bound = |target, id| DeviceCommand::BindFramebuffer { target, id };

    let offscreen = commands
        .iter()
        .rposition(|c| *c == bound(FramebufferTarget::Both, fbo))
        .expect("offscreen bind");
    let draw = commands.iter().position(DeviceCommand::is_draw).expect("draw");
    let back_to_window = commands
        .iter()
        .rposition(|c| *c == bound(FramebufferTarget::Both, 0))
        .expect("window bind");
    let read = commands
        .iter()
        .position(|c| *c == bound(FramebufferTarget::Read, fbo))
        .expect("read bind");
    let blit = commands
        .iter()
        .position(|c| matches!(c, DeviceCommand::BlitFramebuffer { .. }))
        .expect("blit");
    let present = commands
        .iter()
        .position(|c| *c == DeviceCommand::Present)
        .expect("present");

    assert!(offscreen < draw && draw < back_to_window);
    assert!(back_to_window < read && read < blit && blit < present);
    assert!(commands.contains(&DeviceCommand::BlitFramebuffer {
        src: (640, 480),
        dst: (640, 480)
    }));
}

#[test]
fn test_framebuffer_blit_matches_window_sampling() {
    let (device, _) = run_frames(
        FramebufferSample::config(),
        FramebufferSample::default(),
        HeadlessPlatform::new().close_after_frames(2),
    );
    assert!(device.invalid_operations().is_empty(), "{:?}", device.invalid_operations());

    // The same content in a multisampled window would only ever show the clear color
    let mut multisampled = FramebufferSample::config();
    multisampled.window.samples = 4;
    let (device, _) = run_frames(
        multisampled,
        FramebufferSample::default(),
        HeadlessPlatform::new().close_after_frames(2),
    );
    assert_eq!(device.invalid_operations().len(), 2);
}

#[test]
fn test_framebuffer_follows_window_resize() {
    let platform = HeadlessPlatform::new()
        .with_event_at(1, ShellEvent::Resized { width: 800, height: 600 })
        .close_after_frames(2);
    let (device, sample) =
        run_frames(FramebufferSample::config(), FramebufferSample::default(), platform);

    let commands = device.commands();
    assert!(commands.contains(&DeviceCommand::TextureStorage2D { width: 640, height: 480 }));
    assert!(commands.contains(&DeviceCommand::TextureStorage2D { width: 800, height: 600 }));
    assert!(commands.contains(&DeviceCommand::BlitFramebuffer {
        src: (800, 600),
        dst: (800, 600)
    }));
    assert_eq!(sample.content().target_size(), (800, 600));
}

#[test]
fn test_incomplete_framebuffer_fails_init_cleanly() {
    let platform = HeadlessPlatform::new();
    let device = platform.device();
    let stats = platform.stats();
    device.fail_framebuffer_check();

    let mut sample =
        Sample::new(FramebufferSample::config(), Box::new(platform), FramebufferSample::default());
    let result = sample.init();
    assert!(matches!(
        result,
        Err(SampleError::Graphics(GraphicsError::IncompleteFramebuffer(_)))
    ));
    assert_eq!(sample.state(), SampleState::Uninitialized);
    assert_eq!(stats.closed(), 1);

    let commands = device.commands();
    let fbo = creates(&device, ResourceKind::Framebuffer)[0];
    let texture = creates(&device, ResourceKind::Texture)[0];
    let attach = commands
        .iter()
        .position(|c| *c == DeviceCommand::FramebufferColorTexture(texture))
        .expect("attach");
    assert_eq!(
        commands[attach + 1],
        DeviceCommand::BindFramebuffer { target: FramebufferTarget::Both, id: 0 }
    );
    assert!(commands.contains(&DeviceCommand::Delete { kind: ResourceKind::Framebuffer, id: fbo }));
    assert!(commands.contains(&DeviceCommand::Delete { kind: ResourceKind::Texture, id: texture }));
    assert_no_leaks(&device);
}

#[test]
fn test_missing_framebuffer_object_fails_init_cleanly() {
    let platform = HeadlessPlatform::new();
    let device = platform.device();
    device.fail_creating(ResourceKind::Framebuffer);

    let mut sample =
        Sample::new(FramebufferSample::config(), Box::new(platform), FramebufferSample::default());
    assert!(matches!(
        sample.init(),
        Err(SampleError::Graphics(GraphicsError::ResourceCreation(ResourceKind::Framebuffer)))
    ));
    assert_no_leaks(&device);
}

#[test]
fn test_overrides_file_reaches_the_window() {
    let name = format!("framebuffer_overrides_{}.toml", std::process::id());
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, "[window]\nwidth = 320\nheight = 240\n").expect("write");
    let config = FramebufferSample::config().with_overrides_from(&path);
    let _ = std::fs::remove_file(&path);
    let config = config.expect("valid overrides");
    assert_eq!(config.window.title, "Framebuffer Object");

    let (device, _) = run_frames(
        config,
        FramebufferSample::default(),
        HeadlessPlatform::new().close_after_frames(1),
    );
    assert!(device.commands().contains(&DeviceCommand::BlitFramebuffer {
        src: (320, 240),
        dst: (320, 240)
    }));
}

#[test]
fn test_overrides_file_is_named_after_the_binary() {
    let path = samples_app::overrides_path().expect("current exe");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("toml"));
    assert_eq!(path.components().count(), 1);
}

#[test]
fn test_shipped_shaders_resolve() {
    for (vertex, fragment) in [
        ("triangle.vert", "triangle.frag"),
        ("transform.vert", "transform.frag"),
        ("mvp.vert", "mvp.frag"),
        ("instancing.vert", "instancing.frag"),
    ] {
        let paths = samples_app::shader_paths(vertex, fragment);
        assert!(paths.vertex.is_file(), "{}", paths.vertex.display());
        assert!(paths.fragment.is_file(), "{}", paths.fragment.display());
    }
}

#[test]
fn test_logging_init_is_repeatable() {
    use sample_framework::foundation::logging::{self, LevelFilter};

    logging::init(LevelFilter::Warn);
    logging::init(LevelFilter::Info);
    logging::info!("logging initialized twice");
}
