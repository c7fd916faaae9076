use reveal_macros::Animatable;

use super::{Property, PropertyValues};

/// 2D transformation derived from an element's animated values
///
/// Applied during paint only; it never triggers layout recalculation.
#[derive(Clone, Copy, Debug, PartialEq, Animatable)]
pub struct Transform {
    /// Translation in x and y
    pub translate: (f32, f32),
    /// Scale in x and y (1.0 = no scale)
    pub scale: (f32, f32),
    /// Rotation in radians (clockwise)
    pub rotate: f32,
    /// Transform origin as fraction of size (0.5, 0.5 = center)
    #[animatable(skip)]
    pub origin: (f32, f32),
}

impl Transform {
    /// Identity transform (no transformation)
    pub const IDENTITY: Self = Self {
        translate: (0.0, 0.0),
        scale: (1.0, 1.0),
        rotate: 0.0,
        origin: (0.5, 0.5),
    };

    /// Build the paint transform for a set of animated values
    ///
    /// `X`/`Y` become the translation, `Scale` a uniform scale and
    /// `Rotation` (degrees) the rotation. Other properties are not part of
    /// the 2D transform.
    pub fn from_values(values: &PropertyValues) -> Self {
        let scale = values.get_or_initial(Property::Scale);
        Self {
            translate: (
                values.get_or_initial(Property::X),
                values.get_or_initial(Property::Y),
            ),
            scale: (scale, scale),
            rotate: values.get_or_initial(Property::Rotation).to_radians(),
            origin: Self::IDENTITY.origin,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animatable;

    #[test]
    fn test_from_values() {
        let values = PropertyValues::new().y(-5.0).scale(1.05).rotation(90.0);
        let t = Transform::from_values(&values);
        assert_eq!(t.translate, (0.0, -5.0));
        assert_eq!(t.scale, (1.05, 1.05));
        assert!((t.rotate - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_missing_values_are_identity() {
        assert_eq!(Transform::from_values(&PropertyValues::new()), Transform::IDENTITY);
    }

    #[test]
    fn test_derived_lerp_keeps_origin() {
        let t1 = Transform {
            origin: (0.0, 0.0),
            ..Transform::IDENTITY
        };
        let t2 = Transform {
            translate: (10.0, 20.0),
            origin: (1.0, 1.0),
            ..Transform::IDENTITY
        };
        let mid = Transform::lerp(&t1, &t2, 0.5);
        assert_eq!(mid.translate, (5.0, 10.0));
        assert_eq!(mid.origin, (0.0, 0.0));
    }
}
