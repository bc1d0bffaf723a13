pub struct BBox {
    min: geo::Coord<f64>,
    max: geo::Coord<f64>,
}

impl BBox {
    pub fn extend<C>(&mut self, coord: C)
    where
        C: Into<geo::Coord<f64>>,
    {
        let coord = coord.into();
        self.min.x = self.min.x.min(coord.x);
        self.min.y = self.min.y.min(coord.y);
        self.max.x = self.max.x.max(coord.x);
        self.max.y = self.max.y.max(coord.y);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn center(&self) -> Option<geo::Coord<f64>> {
        if self.is_empty() {
            return None;
        }

        Some(geo::Coord {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        })
    }
}

impl Default for BBox {
    fn default() -> Self {
        BBox {
            min: geo::Coord {
                x: f64::MAX,
                y: f64::MAX,
            },
            max: geo::Coord {
                x: f64::MIN,
                y: f64::MIN,
            },
        }
    }
}

impl<C> FromIterator<C> for BBox
where
    C: Into<geo::Coord<f64>>,
{
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut bbox = BBox::default();
        for coord in iter {
            bbox.extend(coord);
        }
        bbox
    }
}
