//! Circle-circle overlap tests and nearest-target search.

use crate::vector2::Vector2;

/// Anything with a circular hit area.
pub trait Body {
    fn position(&self) -> Vector2;
    fn radius(&self) -> f32;
}

/// Strict overlap: circles that exactly touch do not collide.
pub fn circles_overlap(a: Vector2, a_radius: f32, b: Vector2, b_radius: f32) -> bool {
    a.distance_to(b) < a_radius + b_radius
}

pub fn collides(a: &impl Body, b: &impl Body) -> bool {
    circles_overlap(a.position(), a.radius(), b.position(), b.radius())
}

/// A hostile that autofire or the drone can aim at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    Enemy(usize),
    Boss,
}

/// Nearest hostile to `from` by Euclidean distance.  Enemies are scanned in
/// order and the boss only wins when strictly closer than every enemy.
pub fn find_closest<'a, E, B>(
    from: Vector2,
    enemies: impl IntoIterator<Item = &'a E>,
    boss: Option<&B>,
) -> Option<Target>
where
    E: Body + 'a,
    B: Body,
{
    let mut closest = None;
    let mut closest_distance = f32::INFINITY;
    for (i, enemy) in enemies.into_iter().enumerate() {
        let distance = enemy.position().distance_to(from);
        if distance < closest_distance {
            closest = Some(Target::Enemy(i));
            closest_distance = distance;
        }
    }
    if let Some(boss) = boss {
        if boss.position().distance_to(from) < closest_distance {
            closest = Some(Target::Boss);
        }
    }
    closest
}
