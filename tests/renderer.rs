use cgmath::Vector4;

use glint::device::headless::{Command, CommandLog, HeadlessDevice};
use glint::prelude::*;

fn pair() -> (Renderer, CommandLog) {
    let _ = env_logger::try_init();

    let device = HeadlessDevice::new();
    let commands = device.commands();
    let renderer = Renderer::new(Box::new(device)).unwrap();
    commands.clear();
    (renderer, commands)
}

fn is_blend_toggle(v: &Command) -> bool {
    match v {
        Command::SetCapability(glint::device::Capability::Blend, _) => true,
        _ => false,
    }
}

#[test]
fn defaults_applied_at_construction() {
    let _ = env_logger::try_init();

    let device = HeadlessDevice::new();
    let commands = device.commands();
    let renderer = Renderer::new(Box::new(device)).unwrap();

    assert!(commands.contains(&Command::SetClearColor(Color::transparent())));
    assert!(commands.contains(&Command::SetCapability(
        glint::device::Capability::DepthTest,
        true
    )));
    assert!(commands.contains(&Command::SetCapability(
        glint::device::Capability::CullFace,
        false
    )));
    assert!(commands.contains(&Command::SetCapability(
        glint::device::Capability::Blend,
        false
    )));
    assert!(commands.contains(&Command::SetBlendFunc(
        BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha
    )));
    assert!(commands.contains(&Command::SetBlendEquation(BlendEquation::Add)));

    assert_eq!(renderer.render_state(StateSlot::DepthTest), 1);
    assert_eq!(renderer.render_state(StateSlot::Blend), 0);
    assert_eq!(
        renderer.render_state(StateSlot::CullMode),
        u32::from(CullMode::Nothing)
    );
}

#[test]
fn redundant_state_change_is_elided() {
    let (mut renderer, commands) = pair();

    renderer.set_render_state(StateSlot::Blend, true).unwrap();
    renderer.set_render_state(StateSlot::Blend, true).unwrap();

    assert_eq!(commands.count(is_blend_toggle), 1);
}

#[test]
fn state_already_at_default_issues_nothing() {
    let (mut renderer, commands) = pair();

    // Blending is off by default, so neither call reaches the device.
    renderer.set_render_state(StateSlot::Blend, false).unwrap();
    renderer.set_render_state(StateSlot::Blend, false).unwrap();

    assert_eq!(commands.count(is_blend_toggle), 0);
}

#[test]
fn second_write_is_a_no_op_for_every_implemented_slot() {
    let (mut renderer, commands) = pair();

    renderer.set_render_state(StateSlot::DepthTest, false).unwrap();
    renderer
        .set_render_state(StateSlot::BlendSrc, BlendFactor::One)
        .unwrap();
    renderer
        .set_render_state(StateSlot::BlendOp, BlendEquation::Subtract)
        .unwrap();
    renderer
        .set_render_state(StateSlot::CullMode, CullMode::Back)
        .unwrap();

    let issued = commands.take();

    renderer.set_render_state(StateSlot::DepthTest, false).unwrap();
    renderer
        .set_render_state(StateSlot::BlendSrc, BlendFactor::One)
        .unwrap();
    renderer
        .set_render_state(StateSlot::BlendOp, BlendEquation::Subtract)
        .unwrap();
    renderer
        .set_render_state(StateSlot::CullMode, CullMode::Back)
        .unwrap();

    assert!(!issued.is_empty());
    assert!(commands.is_empty());
}

#[test]
fn blend_factors_read_their_sibling_from_the_cache() {
    let (mut renderer, commands) = pair();

    renderer
        .set_render_state(StateSlot::BlendSrc, BlendFactor::One)
        .unwrap();
    assert_eq!(
        commands.last(|v| match v {
            Command::SetBlendFunc(_, _) => true,
            _ => false,
        }),
        Some(Command::SetBlendFunc(
            BlendFactor::One,
            BlendFactor::OneMinusSrcAlpha
        ))
    );

    renderer
        .set_render_state(StateSlot::BlendDst, BlendFactor::DstAlpha)
        .unwrap();
    assert_eq!(
        commands.last(|v| match v {
            Command::SetBlendFunc(_, _) => true,
            _ => false,
        }),
        Some(Command::SetBlendFunc(
            BlendFactor::One,
            BlendFactor::DstAlpha
        ))
    );
}

#[test]
fn blend_function_matches_last_write_regardless_of_order() {
    let (mut a, commands_a) = pair();
    a.set_render_state(StateSlot::BlendSrc, BlendFactor::Zero)
        .unwrap();
    a.set_render_state(StateSlot::BlendDst, BlendFactor::DstColor)
        .unwrap();

    let (mut b, commands_b) = pair();
    b.set_render_state(StateSlot::BlendDst, BlendFactor::DstColor)
        .unwrap();
    b.set_render_state(StateSlot::BlendSrc, BlendFactor::Zero)
        .unwrap();

    let expected = Some(Command::SetBlendFunc(
        BlendFactor::Zero,
        BlendFactor::DstColor,
    ));
    let last = |commands: &CommandLog| {
        commands.last(|v| match v {
            Command::SetBlendFunc(_, _) => true,
            _ => false,
        })
    };

    assert_eq!(last(&commands_a), expected);
    assert_eq!(last(&commands_b), expected);
}

#[test]
fn cull_mode_nothing_disables_culling() {
    let (mut renderer, commands) = pair();

    renderer
        .set_render_state(StateSlot::CullMode, CullMode::Back)
        .unwrap();
    assert!(commands.contains(&Command::SetCapability(
        glint::device::Capability::CullFace,
        true
    )));
    assert!(commands.contains(&Command::SetCullFace(CullMode::Back)));

    commands.clear();
    renderer
        .set_render_state(StateSlot::CullMode, CullMode::Nothing)
        .unwrap();
    assert!(commands.contains(&Command::SetCapability(
        glint::device::Capability::CullFace,
        false
    )));
    assert_eq!(
        commands.count(|v| match v {
            Command::SetCullFace(_) => true,
            _ => false,
        }),
        0
    );
}

#[test]
#[should_panic(expected = "not implemented")]
fn reserved_slot_is_fatal() {
    let (mut renderer, _) = pair();
    let _ = renderer.set_render_state(StateSlot::DepthWrite, true);
}

#[test]
#[should_panic(expected = "expected 0 or 1")]
fn out_of_range_toggle_is_fatal() {
    let (mut renderer, _) = pair();
    let _ = renderer.set_render_state(StateSlot::Blend, 2u32);
}

#[test]
#[should_panic(expected = "Invalid blend factor")]
fn out_of_range_blend_factor_is_fatal() {
    let (mut renderer, _) = pair();
    let _ = renderer.set_render_state(StateSlot::BlendSrc, 42u32);
}

#[test]
fn clear_masks() {
    let (mut renderer, commands) = pair();

    renderer.clear_all().unwrap();
    assert!(commands.contains(&Command::Clear(true, true, true)));

    commands.clear();
    renderer.clear(COLOR_BUFFER).unwrap();
    assert!(commands.contains(&Command::Clear(true, false, false)));

    commands.clear();
    renderer.clear(DEPTH_BUFFER | STENCIL_BUFFER).unwrap();
    assert!(commands.contains(&Command::Clear(false, true, true)));
}

#[test]
fn clear_color_is_applied_unconditionally() {
    let (mut renderer, commands) = pair();

    let c = Color(0.1, 0.2, 0.3, 1.0);
    renderer.set_clear_color(c).unwrap();
    renderer.set_clear_color(c).unwrap();

    assert_eq!(
        commands.count(|v| match v {
            Command::SetClearColor(_) => true,
            _ => false,
        }),
        2
    );
    assert_eq!(renderer.clear_color(), c);
}

#[test]
fn viewport_is_coerced_to_integers() {
    let (mut renderer, commands) = pair();

    renderer
        .set_viewport(Vector4::new(0.0, 0.0, 640.9, 480.2))
        .unwrap();
    assert!(commands.contains(&Command::SetViewport(0, 0, 640, 480)));
}

#[test]
fn draw_indexed_is_dispatched_as_is() {
    let (mut renderer, commands) = pair();

    renderer.draw_indexed(Primitive::Triangles, 6, 0).unwrap();
    assert!(commands.contains(&Command::DrawElements(Primitive::Triangles, 6, 0)));
}
