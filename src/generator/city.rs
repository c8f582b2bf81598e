use rand::Rng;
use strum_macros::{Display, EnumIter, EnumString};

use crate::geo::{BoundingBox, GeoPoint};

/// Cities whose bounding boxes random trips are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum City {
    #[strum(to_string = "Los Angeles", serialize = "los-angeles")]
    LosAngeles,
    #[strum(to_string = "Las Vegas", serialize = "las-vegas")]
    LasVegas,
}

impl City {
    pub fn bounds(&self) -> BoundingBox {
        match self {
            City::LosAngeles => BoundingBox {
                min_latitude: 33.830504,
                min_longitude: -118.385967,
                max_latitude: 34.007444,
                max_longitude: -118.070118,
            },
            City::LasVegas => BoundingBox {
                min_latitude: 36.147515,
                min_longitude: -115.247185,
                max_latitude: 36.253734,
                max_longitude: -115.113607,
            },
        }
    }

    pub fn random_point(&self, rng: &mut impl Rng) -> GeoPoint {
        let bounds = self.bounds();
        GeoPoint::new(
            rng.random_range(bounds.min_latitude..bounds.max_latitude),
            rng.random_range(bounds.min_longitude..bounds.max_longitude),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Los Angeles".parse::<City>().unwrap(), City::LosAngeles);
        assert_eq!("las vegas".parse::<City>().unwrap(), City::LasVegas);
        assert_eq!("LOS-ANGELES".parse::<City>().unwrap(), City::LosAngeles);
        assert!("Springfield".parse::<City>().is_err());
        assert_eq!(City::LasVegas.to_string(), "Las Vegas");
    }

    #[test]
    fn random_points_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for city in City::iter() {
            for _ in 0..100 {
                let point = city.random_point(&mut rng);
                assert!(city.bounds().contains(&point), "{city}: {point:?}");
            }
        }
    }
}
