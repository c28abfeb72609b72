/// Width of the stamped signature, in page units.
pub const SIGNATURE_WIDTH: f64 = 150.0;
/// Height of the stamped signature, in page units.
pub const SIGNATURE_HEIGHT: f64 = 50.0;
/// Distance between the bottom edge of the page and the signature.
pub const SIGNATURE_BOTTOM_OFFSET: f64 = 50.0;

/// Axis aligned rectangle in PDF user space. `(x1, y1)` is the lower left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rectangle {
    /// Build a rectangle from any two opposite corners.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Rectangle {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Where the signature goes on a page with the given box:
    /// horizontally centered, a fixed distance above the bottom edge.
    /// No scaling or rotation is applied.
    pub fn signature_on(page: &Rectangle) -> Self {
        let x1 = page.x1 + page.width() / 2.0 - SIGNATURE_WIDTH / 2.0;
        let y1 = page.y1 + SIGNATURE_BOTTOM_OFFSET;
        Rectangle {
            x1,
            y1,
            x2: x1 + SIGNATURE_WIDTH,
            y2: y1 + SIGNATURE_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_centered_above_bottom_edge() {
        let letter = Rectangle::from_corners((0.0, 0.0), (612.0, 792.0));
        let rect = Rectangle::signature_on(&letter);
        assert_eq!(
            rect,
            Rectangle {
                x1: 231.0,
                y1: 50.0,
                x2: 381.0,
                y2: 100.0
            }
        );
    }

    #[test]
    fn signature_follows_shifted_media_box() {
        let page = Rectangle::from_corners((100.0, 200.0), (300.0, 400.0));
        let rect = Rectangle::signature_on(&page);
        assert_eq!(rect.x1, 125.0);
        assert_eq!(rect.y1, 250.0);
        assert_eq!(rect.width(), SIGNATURE_WIDTH);
        assert_eq!(rect.height(), SIGNATURE_HEIGHT);
    }

    #[test]
    fn corners_are_normalized() {
        let rect = Rectangle::from_corners((10.0, 20.0), (0.0, 5.0));
        assert_eq!((rect.x1, rect.y1, rect.x2, rect.y2), (0.0, 5.0, 10.0, 20.0));
    }
}
