/// Trait for types that can be animated by interpolating between values
///
/// Structs with named fields can `#[derive(Animatable)]` to interpolate
/// field by field.
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values
    /// t = 0.0 returns `from`, t = 1.0 returns `to`
    /// t can exceed [0, 1] range for overshoot effects
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        // Exact endpoints so a reversed tween restores the start value bit for bit
        if t == 0.0 {
            return *from;
        }
        if t == 1.0 {
            return *to;
        }
        from + (to - from) * t
    }
}

impl Animatable for (f32, f32) {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        (f32::lerp(&from.0, &to.0, t), f32::lerp(&from.1, &to.1, t))
    }
}
