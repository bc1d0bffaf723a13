use cyclable_core::{
    pairs::PairRequest,
    ride::{Coordinate, Ride, TableRow},
    tags::Tags,
};
use serde::Deserialize;

use crate::client::BRouterError;

// Columns of the "messages" table
const LONGITUDE: usize = 0;
const LATITUDE: usize = 1;
const ELEVATION: usize = 2;
const DISTANCE: usize = 3;
const WAY_TAGS: usize = 9;

#[derive(Deserialize)]
pub struct BRouterResponse {
    pub features: Vec<BRouterFeature>,
}

#[derive(Deserialize)]
pub struct BRouterFeature {
    pub geometry: BRouterGeometry,
    pub properties: BRouterProperties,
}

#[derive(Deserialize)]
pub struct BRouterGeometry {
    /// `[lon, lat, elevation]`
    pub coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
pub struct BRouterProperties {
    /// First row is the header.
    pub messages: Option<Vec<Vec<MessageCell>>>,
}

/// BRouter writes every cell as a string, but nothing forbids numbers.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum MessageCell {
    Text(String),
    Number(f64),
    List(Vec<String>),
    Null,
}

impl MessageCell {
    /// Finite numbers only, `NaN` or `inf` would poison the score.
    fn as_f64(&self) -> Option<f64> {
        let number = match self {
            MessageCell::Text(text) => text.trim().parse::<f64>().ok(),
            MessageCell::Number(number) => Some(*number),
            _ => None,
        };

        number.filter(|number| number.is_finite())
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            MessageCell::Text(text) => text.trim().parse().ok(),
            MessageCell::Number(number) if number.fract() == 0.0 => Some(*number as i64),
            _ => None,
        }
    }

    fn as_tags(&self) -> Tags {
        match self {
            MessageCell::Text(text) => Tags::parse(text),
            MessageCell::List(tokens) => Tags::parse(&tokens.join(" ")),
            MessageCell::Number(_) | MessageCell::Null => Tags::new(),
        }
    }
}

fn malformed(message: impl Into<String>) -> BRouterError {
    BRouterError::Malformed(message.into())
}

fn parse_row(index: usize, row: &[MessageCell]) -> Result<TableRow, BRouterError> {
    if row.len() <= WAY_TAGS {
        return Err(malformed(format!(
            "message row {index} has {} columns, expected at least {}",
            row.len(),
            WAY_TAGS + 1
        )));
    }

    let integer = |column: usize| {
        row[column].as_i64().ok_or_else(|| {
            malformed(format!("message row {index}, column {column} is not an integer"))
        })
    };
    let decimal = |column: usize| {
        row[column].as_f64().ok_or_else(|| {
            malformed(format!("message row {index}, column {column} is not a number"))
        })
    };

    Ok(TableRow {
        boundary_lon: integer(LONGITUDE)?,
        boundary_lat: integer(LATITUDE)?,
        elevation: decimal(ELEVATION)?,
        distance: decimal(DISTANCE)?,
        tags: row[WAY_TAGS].as_tags(),
    })
}

fn parse_coordinate(position: &[f64]) -> Result<Coordinate, BRouterError> {
    match position {
        [lon, lat, ..] => Ok([*lon, *lat]),
        _ => Err(malformed(format!(
            "geometry position has {} values",
            position.len()
        ))),
    }
}

impl BRouterResponse {
    pub fn into_ride(self, pair: &PairRequest<'_>) -> Result<Ride, BRouterError> {
        let mut features = self.features.into_iter();

        let feature = features
            .next()
            .ok_or_else(|| malformed("response has no feature"))?;
        if features.next().is_some() {
            return Err(malformed("response has more than one feature"));
        }

        let messages = feature
            .properties
            .messages
            .ok_or_else(|| malformed("response has no messages table"))?;

        let table = messages
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| parse_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;

        let geometry = feature
            .geometry
            .coordinates
            .iter()
            .map(|position| parse_coordinate(position))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Ride {
            geometry,
            table,
            from_point: pair.origin.id.clone(),
            to_point: pair.destination.id.clone(),
            backbone_ride: pair.is_backbone(),
        })
    }
}
