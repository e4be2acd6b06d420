//! Image-space geometry

use serde::{Deserialize, Serialize};

/// A 2-D point in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= f64::from(self.x)
            && point.y >= f64::from(self.y)
            && point.x <= f64::from(self.x + self.width)
            && point.y <= f64::from(self.y + self.height)
    }
}

shared::impl_serde_jsonable!(Point, BoundingBox);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{FromJson, Jsonable};

    #[test]
    fn test_point_json() {
        let point = Point::new(1.5, -2.0);
        assert_eq!(point.to_json(), json!({"x": 1.5, "y": -2.0}));
        assert_eq!(Point::from_json(&json!({"x": 1, "y": 2})).unwrap(), Point::new(1.0, 2.0));
        assert_eq!(point.distance(&Point::new(4.5, 2.0)), 5.0);
    }

    #[test]
    fn test_point_missing_coordinate() {
        let err = Point::from_json(&json!({"x": 1})).unwrap_err();
        assert_eq!(err.field(), Some("y"));
    }

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox::new(10, 20, 100, 50);
        assert_eq!(bbox.area(), 5000);
        assert_eq!(bbox.center(), Point::new(60.0, 45.0));
        assert!(bbox.contains(&Point::new(10.0, 70.0)));
        assert!(!bbox.contains(&Point::new(111.0, 30.0)));

        let json = bbox.to_json();
        assert_eq!(json, json!({"x": 10, "y": 20, "width": 100, "height": 50}));
        assert_eq!(BoundingBox::from_json(&json).unwrap(), bbox);
    }
}
