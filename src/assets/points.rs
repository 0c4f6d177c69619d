use crate::{
    assets::color::Rgba8,
    foundation::core::{Point, Vec2},
};

/// One weighted point of a shape: a center, a render radius and an optional color.
///
/// Points are immutable once a sampler produced them. A missing color means
/// "use the scene's particle color".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub color: Option<Rgba8>,
}

/// Ordered list of dots. Sampler output always has exactly the scene's particle count.
pub type PointSet = Vec<Dot>;

impl Dot {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            x,
            y,
            r,
            color: None,
        }
    }

    pub fn with_color(self, color: Rgba8) -> Self {
        Self {
            color: Some(color),
            ..self
        }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn offset(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }
}

// Persisted as `[x, y, r]` or `[x, y, r, "#rrggbb"]`.
impl serde::Serialize for Dot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple as _;

        let len = if self.color.is_some() { 4 } else { 3 };
        let mut t = serializer.serialize_tuple(len)?;
        t.serialize_element(&self.x)?;
        t.serialize_element(&self.y)?;
        t.serialize_element(&self.r)?;
        if let Some(c) = self.color {
            t.serialize_element(&c.to_hex())?;
        }
        t.end()
    }
}

impl<'de> serde::Deserialize<'de> for Dot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain((f64, f64, f64)),
            Colored((f64, f64, f64, String)),
        }

        let dot = match Repr::deserialize(deserializer)? {
            Repr::Plain((x, y, r)) => Dot::new(x, y, r),
            Repr::Colored((x, y, r, color)) => {
                let color = Rgba8::parse_hex(&color).map_err(serde::de::Error::custom)?;
                Dot::new(x, y, r).with_color(color)
            }
        };

        if !(dot.x.is_finite() && dot.y.is_finite() && dot.r.is_finite()) {
            return Err(serde::de::Error::custom("dot coordinates must be finite"));
        }
        Ok(dot)
    }
}
