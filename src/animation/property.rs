//! Visual properties an animation can drive.
//!
//! Animations only ever mutate these paint-level values; they never change
//! structure or layout of the host document.

use bitflags::bitflags;

use super::Animatable;

/// A single animatable visual property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Opacity,
    /// Horizontal translation offset
    X,
    /// Vertical translation offset
    Y,
    Scale,
    /// Rotation around the z axis, in degrees
    Rotation,
    /// Rotation around the x axis, in degrees (character flip-in)
    RotationX,
    /// Fill length along the horizontal axis (progress bars)
    Width,
    /// Fill length along the vertical axis (timeline connector)
    Height,
}

impl Property {
    pub const ALL: [Property; 8] = [
        Property::Opacity,
        Property::X,
        Property::Y,
        Property::Scale,
        Property::Rotation,
        Property::RotationX,
        Property::Width,
        Property::Height,
    ];

    /// Value a property has when nothing has written it yet
    pub fn initial_value(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            _ => 0.0,
        }
    }

    /// The flag for this property in a [`PropertySet`]
    pub fn flag(self) -> PropertySet {
        match self {
            Property::Opacity => PropertySet::OPACITY,
            Property::X => PropertySet::X,
            Property::Y => PropertySet::Y,
            Property::Scale => PropertySet::SCALE,
            Property::Rotation => PropertySet::ROTATION,
            Property::RotationX => PropertySet::ROTATION_X,
            Property::Width => PropertySet::WIDTH,
            Property::Height => PropertySet::HEIGHT,
        }
    }
}

bitflags! {
    /// Set of properties, used to detect overlapping animations
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PropertySet: u8 {
        const OPACITY    = 0b0000_0001;
        const X          = 0b0000_0010;
        const Y          = 0b0000_0100;
        const SCALE      = 0b0000_1000;
        const ROTATION   = 0b0001_0000;
        const ROTATION_X = 0b0010_0000;
        const WIDTH      = 0b0100_0000;
        const HEIGHT     = 0b1000_0000;
    }
}

impl PropertySet {
    /// Iterate the properties contained in this set, in declaration order
    pub fn properties(self) -> impl Iterator<Item = Property> {
        Property::ALL
            .into_iter()
            .filter(move |p| self.contains(p.flag()))
    }
}

/// An ordered property -> value mapping
///
/// Kept as a small sorted vector: a unit rarely animates more than three
/// or four properties at once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyValues {
    entries: Vec<(Property, f32)>,
}

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.set(property, value);
        self
    }

    pub fn opacity(self, value: f32) -> Self {
        self.with(Property::Opacity, value)
    }

    pub fn x(self, value: f32) -> Self {
        self.with(Property::X, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.with(Property::Y, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.with(Property::Scale, value)
    }

    pub fn rotation(self, value: f32) -> Self {
        self.with(Property::Rotation, value)
    }

    pub fn rotation_x(self, value: f32) -> Self {
        self.with(Property::RotationX, value)
    }

    pub fn width(self, value: f32) -> Self {
        self.with(Property::Width, value)
    }

    pub fn height(self, value: f32) -> Self {
        self.with(Property::Height, value)
    }

    pub fn get(&self, property: Property) -> Option<f32> {
        self.entries
            .binary_search_by_key(&property, |(p, _)| *p)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Value of a property, falling back to its initial value
    pub fn get_or_initial(&self, property: Property) -> f32 {
        self.get(property)
            .unwrap_or_else(|| property.initial_value())
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match self.entries.binary_search_by_key(&property, |(p, _)| *p) {
            Ok(i) => self.entries[i].1 = value,
            Err(i) => self.entries.insert(i, (property, value)),
        }
    }

    /// Overwrite entries with those from `other`
    pub fn merge(&mut self, other: &PropertyValues) {
        for (property, value) in other.iter() {
            self.set(property, value);
        }
    }

    /// The set of properties present
    pub fn keys(&self) -> PropertySet {
        self.entries
            .iter()
            .fold(PropertySet::empty(), |set, (p, _)| set | p.flag())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Property, f32)> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = (Property, f32)>>(iter: I) -> Self {
        let mut values = PropertyValues::new();
        for (property, value) in iter {
            values.set(property, value);
        }
        values
    }
}

impl Animatable for PropertyValues {
    /// Interpolates every property present in `to`; properties missing from
    /// `from` start at their initial value.
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        to.iter()
            .map(|(property, end)| {
                let start = from.get_or_initial(property);
                (property, f32::lerp(&start, &end, t))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_lerp() {
        let from = PropertyValues::new().opacity(0.0).y(20.0);
        let to = PropertyValues::new().opacity(1.0).y(0.0).scale(2.0);
        let mid = PropertyValues::lerp(&from, &to, 0.5);
        assert_eq!(mid.get(Property::Opacity), Some(0.5));
        assert_eq!(mid.get(Property::Y), Some(10.0));
        // Scale was missing from `from`, so it starts at 1.0
        assert_eq!(mid.get(Property::Scale), Some(1.5));
    }

    #[test]
    fn test_set_and_get() {
        let values = PropertyValues::new().opacity(0.0).y(20.0);
        assert_eq!(values.get(Property::Opacity), Some(0.0));
        assert_eq!(values.get(Property::Y), Some(20.0));
        assert_eq!(values.get(Property::X), None);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_set_overwrites() {
        let mut values = PropertyValues::new().scale(0.9);
        values.set(Property::Scale, 1.05);
        assert_eq!(values.get(Property::Scale), Some(1.05));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_initial_values() {
        let values = PropertyValues::new();
        assert_eq!(values.get_or_initial(Property::Opacity), 1.0);
        assert_eq!(values.get_or_initial(Property::Scale), 1.0);
        assert_eq!(values.get_or_initial(Property::Height), 0.0);
    }

    #[test]
    fn test_keys_and_set_iteration() {
        let values = PropertyValues::new().y(0.0).opacity(1.0);
        let keys = values.keys();
        assert_eq!(keys, PropertySet::OPACITY | PropertySet::Y);
        let listed: Vec<_> = keys.properties().collect();
        assert_eq!(listed, vec![Property::Opacity, Property::Y]);
    }

    #[test]
    fn test_merge() {
        let mut base = PropertyValues::new().opacity(1.0).scale(1.0);
        base.merge(&PropertyValues::new().opacity(0.0).y(50.0));
        assert_eq!(base.get(Property::Opacity), Some(0.0));
        assert_eq!(base.get(Property::Scale), Some(1.0));
        assert_eq!(base.get(Property::Y), Some(50.0));
    }
}
