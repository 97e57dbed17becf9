//! Floors, blocks and a canopy to paint over, plus camera and light.

use bevy::prelude::*;

use painter::{FloorCollider, SceneLayer, SceneTag};

pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 22.0, 18.0);
/// Layer of the canopy, left out of the floor probe by the default demo config.
pub const CANOPY_LAYER: u8 = 8;

/// Box with a visible mesh and a matching floor collider.
fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    center: Vec3,
    size: Vec3,
) -> Entity {
    commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(material),
            Transform::from_translation(center),
            FloorCollider::from_size(size),
        ))
        .id()
}

pub fn setup_demo_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let ground = materials.add(Color::srgb(0.35, 0.4, 0.3));
    let stone = materials.add(Color::srgb(0.55, 0.52, 0.5));
    let glass = materials.add(Color::srgba(0.6, 0.8, 0.9, 0.35));

    // Ground slab with its top face at y = 0.
    spawn_block(
        &mut commands,
        &mut meshes,
        ground,
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(24.0, 1.0, 24.0),
    );
    // Raised platform and a step.
    spawn_block(
        &mut commands,
        &mut meshes,
        stone.clone(),
        Vec3::new(-5.0, 1.0, -3.0),
        Vec3::new(6.0, 2.0, 4.0),
    );
    spawn_block(
        &mut commands,
        &mut meshes,
        stone,
        Vec3::new(5.0, 0.5, 4.0),
        Vec3::new(3.0, 1.0, 3.0),
    );
    // Canopy over the step; tiles should land under it.
    let canopy = spawn_block(
        &mut commands,
        &mut meshes,
        glass,
        Vec3::new(5.0, 4.0, 4.0),
        Vec3::new(4.0, 0.2, 4.0),
    );
    commands
        .entity(canopy)
        .insert((SceneLayer(CANOPY_LAYER), SceneTag::new("Canopy")));

    info!(
        "Demo scene ready: click to paint, Ctrl+click to erase, [ and ] resize the brush, \
         R rebuilds, Delete clears, Tab toggles the designer"
    );
}
