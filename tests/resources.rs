use cgmath::Vector2;

use glint::device::headless::{Command, CommandLog, HeadlessDevice};
use glint::device::BufferTarget;
use glint::prelude::*;

fn pair() -> (Renderer, CommandLog) {
    let _ = env_logger::try_init();

    let device = HeadlessDevice::new();
    let commands = device.commands();
    let renderer = Renderer::new(Box::new(device)).unwrap();
    commands.clear();
    (renderer, commands)
}

/// Two triangles forming a unit quad: position (3 floats) + uv (2 floats).
fn quad() -> VertexList {
    let layout = VertexLayout::build()
        .with("Position", AttributeType::Float, 3, false)
        .with("Texcoord", AttributeType::Float, 2, false)
        .finish();

    #[rustfmt::skip]
    let vertices: Vec<f32> = vec![
        0.0, 0.0, 0.0,   0.0, 0.0,
        1.0, 0.0, 0.0,   1.0, 0.0,
        1.0, 1.0, 0.0,   1.0, 1.0,
        0.0, 1.0, 0.0,   0.0, 1.0,
    ];
    let bytes = vertices.iter().flat_map(|v| v.to_ne_bytes().to_vec()).collect();

    VertexList::new(layout, bytes, vec![0, 1, 2, 2, 3, 0])
}

#[test]
fn quad_geometry_reports_its_shape() {
    let (mut renderer, _) = pair();

    let geometry = renderer
        .create_static_geometry(Primitive::Triangles, quad())
        .unwrap();

    assert_eq!(geometry.primitive(), Primitive::Triangles);
    assert_eq!(geometry.vertex_count(), 4);
    assert_eq!(geometry.index_count(), 6);
    assert_eq!(geometry.vertex_list().vertex_size(), 20);
}

#[test]
fn geometry_creation_leaves_nothing_bound() {
    let (mut renderer, commands) = pair();

    let _geometry = renderer
        .create_static_geometry(Primitive::Triangles, quad())
        .unwrap();

    let issued = commands.take();
    let tail: Vec<_> = issued.iter().rev().take(3).rev().cloned().collect();
    assert_eq!(
        tail,
        vec![
            Command::BindVertexArray(0),
            Command::BindBuffer(BufferTarget::Vertex, 0),
            Command::BindBuffer(BufferTarget::Index, 0),
        ]
    );
}

#[test]
fn geometry_attributes_follow_the_layout() {
    let (mut renderer, commands) = pair();

    let _geometry = renderer
        .create_static_geometry(Primitive::Triangles, quad())
        .unwrap();

    assert!(commands.contains(&Command::SetVertexAttribute {
        index: 0,
        size: 3,
        ty: AttributeType::Float,
        normalized: false,
        stride: 20,
        offset: 0,
    }));
    assert!(commands.contains(&Command::SetVertexAttribute {
        index: 1,
        size: 2,
        ty: AttributeType::Float,
        normalized: false,
        stride: 20,
        offset: 12,
    }));
    assert!(commands.contains(&Command::UploadStaticBuffer(BufferTarget::Vertex, 80)));
    assert!(commands.contains(&Command::UploadStaticBuffer(BufferTarget::Index, 24)));
}

#[test]
#[should_panic(expected = "vertex data")]
fn empty_vertex_data_is_fatal() {
    let (mut renderer, _) = pair();

    let layout = VertexLayout::build()
        .with("Position", AttributeType::Float, 3, false)
        .finish();
    let list = VertexList::new(layout, vec![], vec![0, 1, 2]);

    let _ = renderer.create_static_geometry(Primitive::Triangles, list);
}

#[test]
#[should_panic(expected = "index data")]
fn empty_index_data_is_fatal() {
    let (mut renderer, _) = pair();

    let layout = VertexLayout::build()
        .with("Position", AttributeType::Float, 3, false)
        .finish();
    let list = VertexList::new(layout, vec![0u8; 12], vec![]);

    let _ = renderer.create_static_geometry(Primitive::Triangles, list);
}

#[test]
fn geometry_drop_releases_the_buffers() {
    let (mut renderer, commands) = pair();

    let geometry = renderer
        .create_static_geometry(Primitive::Triangles, quad())
        .unwrap();
    let (vao, vbo, ibo) = (geometry.vao(), geometry.vbo(), geometry.ibo());

    commands.clear();
    drop(geometry);

    assert!(commands.contains(&Command::DeleteVertexArray(vao)));
    assert!(commands.contains(&Command::DeleteBuffer(vbo)));
    assert!(commands.contains(&Command::DeleteBuffer(ibo)));
}

#[test]
fn back_buffer_and_target_frame_buffers_are_distinct() {
    let (mut renderer, commands) = pair();

    let back = renderer.create_frame_buffer();
    assert_eq!(back.id(), 0);
    assert_eq!(back.target_count(), 0);

    let dims = Vector2::new(256, 256);
    let t0 = renderer.create_render_target(dims, TextureFormat::Rgba8).unwrap();
    let t1 = renderer.create_render_target(dims, TextureFormat::Rgba8).unwrap();
    let depth = renderer
        .create_render_target(dims, TextureFormat::Depth24)
        .unwrap();

    commands.clear();
    let offscreen = FrameBuffer::with_targets(
        renderer.context(),
        vec![t0.clone(), t1.clone()],
        Some(depth.clone()),
    )
    .unwrap();

    assert!(offscreen.id() != 0);
    assert_eq!(offscreen.target_count(), 2);
    assert!(offscreen.depth_target().is_some());

    assert!(commands.contains(&Command::AttachColorTarget(0, t0.id())));
    assert!(commands.contains(&Command::AttachColorTarget(1, t1.id())));
    assert!(commands.contains(&Command::AttachDepthTarget(depth.id())));
}

#[test]
fn depth_texture_is_rejected_as_color_target() {
    let (mut renderer, _) = pair();

    let depth = renderer
        .create_render_target(Vector2::new(64, 64), TextureFormat::Depth24)
        .unwrap();

    assert!(FrameBuffer::with_targets(renderer.context(), vec![depth], None).is_err());
}

#[test]
fn binding_the_same_frame_buffer_twice_issues_one_bind() {
    let (renderer, commands) = pair();

    let fb = FrameBuffer::empty(renderer.context()).unwrap();
    commands.clear();

    fb.bind().unwrap();
    fb.bind().unwrap();

    assert_eq!(
        commands.count(|v| match v {
            Command::BindFrameBuffer(_) => true,
            _ => false,
        }),
        1
    );
}

#[test]
fn rebinding_single_color_targets_only_swaps_the_attachment() {
    let (mut renderer, commands) = pair();

    let dims = Vector2::new(128, 128);
    let t0 = renderer.create_render_target(dims, TextureFormat::Rgba8).unwrap();
    let t1 = renderer.create_render_target(dims, TextureFormat::Rgba8).unwrap();
    let fb = FrameBuffer::empty(renderer.context()).unwrap();

    commands.clear();
    fb.bind_target(&t0).unwrap();
    assert!(commands.contains(&Command::BindFrameBuffer(fb.id())));
    assert!(commands.contains(&Command::AttachColorTarget(0, t0.id())));

    commands.clear();
    fb.bind_target(&t0).unwrap();
    assert!(commands.is_empty());

    fb.bind_target(&t1).unwrap();
    assert_eq!(
        commands.take(),
        vec![Command::AttachColorTarget(0, t1.id())]
    );
}

#[test]
fn frame_buffer_drop_releases_the_native_object() {
    let (renderer, commands) = pair();

    let fb = FrameBuffer::empty(renderer.context()).unwrap();
    let id = fb.id();

    commands.clear();
    drop(fb);
    assert!(commands.contains(&Command::DeleteFrameBuffer(id)));

    // The back buffer is not a native object and is never deleted.
    let back = FrameBuffer::back_buffer(renderer.context());
    commands.clear();
    drop(back);
    assert!(commands.is_empty());
}

#[test]
fn binding_the_same_shader_twice_issues_one_bind() {
    let (mut renderer, commands) = pair();

    let shader = renderer.create_shader("void main() {}", "void main() {}").unwrap();
    commands.clear();

    shader.bind().unwrap();
    shader.bind().unwrap();

    assert_eq!(
        commands.count(|v| match v {
            Command::BindProgram(_) => true,
            _ => false,
        }),
        1
    );
}

#[test]
fn dropping_the_bound_shader_resets_the_tracker() {
    let (mut renderer, commands) = pair();

    let first = renderer.create_shader("void main() {}", "void main() {}").unwrap();
    first.bind().unwrap();

    commands.clear();
    drop(first);

    // The deleted program stays current natively; no unbind is issued.
    assert_eq!(
        commands.count(|v| match v {
            Command::BindProgram(_) => true,
            _ => false,
        }),
        0
    );

    // With the tracker cleared, the next bind reaches the device again.
    let second = renderer.create_shader("void main() {}", "void main() {}").unwrap();
    commands.clear();
    second.bind().unwrap();
    assert!(commands.contains(&Command::BindProgram(second.id())));
}

#[test]
fn missing_uniform_resolves_to_the_sentinel_and_uploads_nothing() {
    let _ = env_logger::try_init();

    let mut device = HeadlessDevice::new();
    device.define_uniform("u_color", 3);
    let commands = device.commands();
    let mut renderer = Renderer::new(Box::new(device)).unwrap();

    let shader = renderer.create_shader("void main() {}", "void main() {}").unwrap();
    shader.bind().unwrap();

    assert_eq!(shader.uniform("u_color").unwrap(), 3);
    assert_eq!(shader.uniform("doesNotExist").unwrap(), INVALID_LOCATION);

    commands.clear();
    shader.set_uniform(INVALID_LOCATION, 1.0f32).unwrap();
    assert!(commands.is_empty());

    shader.set_uniform(3, [0.0f32, 0.5, 1.0, 1.0]).unwrap();
    assert_eq!(
        commands.take(),
        vec![Command::SetUniform(
            3,
            UniformVariable::Vector4f([0.0, 0.5, 1.0, 1.0])
        )]
    );
}

#[test]
fn uniform_lookups_are_cached() {
    let _ = env_logger::try_init();

    let mut device = HeadlessDevice::new();
    device.define_uniform("u_mvp", 7);
    let mut renderer = Renderer::new(Box::new(device)).unwrap();

    let shader = renderer.create_shader("void main() {}", "void main() {}").unwrap();
    assert_eq!(shader.uniform("u_mvp").unwrap(), 7);
    assert_eq!(shader.uniform("u_mvp").unwrap(), 7);
    assert_eq!(shader.attribute("Position").unwrap(), INVALID_LOCATION);
}
