use sch_core::{Coordinate, Vector};
use serde_json::Value;

use crate::blueprint::{Blueprint, Deserializer, Serializer};
use crate::error::{CodecError, CodecResult};
use crate::record::{self, Record};

const FIELDS: [&str; 3] = ["x", "y", "z"];

fn write_xyz(kind: &str, x: f64, y: f64, z: f64) -> CodecResult<Record> {
    let mut out = Record::new();
    for (field, value) in FIELDS.into_iter().zip([x, y, z]) {
        let number = serde_json::Number::from_f64(value).ok_or_else(|| CodecError::Unserializable {
            kind: kind.to_string(),
            reason: format!("{field} is not finite"),
        })?;
        out.insert(field.into(), Value::Number(number));
    }
    Ok(out)
}

fn read_xyz(r: &Record) -> CodecResult<(f64, f64, f64)> {
    Ok((
        record::require_f64(r, "x")?,
        record::require_f64(r, "y")?,
        record::require_f64(r, "z")?,
    ))
}

fn has_xyz(r: &Record) -> bool {
    FIELDS.iter().all(|field| record::has_number(r, field))
}

/// Reads and writes `{ "x", "y", "z" }` records for [`Coordinate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateCodec;

impl Serializer<Coordinate> for CoordinateCodec {
    fn serialize(&self, value: &Coordinate) -> CodecResult<Record> {
        write_xyz("coordinate", value.x, value.y, value.z)
    }
}

impl Deserializer<Coordinate> for CoordinateCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<Coordinate> {
        let (x, y, z) = read_xyz(r)?;
        Ok(Coordinate::new(x, y, z))
    }

    fn is_valid(&self, r: &Record) -> bool {
        has_xyz(r)
    }
}

/// Reads and writes `{ "x", "y", "z" }` records for [`Vector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorCodec;

impl Serializer<Vector> for VectorCodec {
    fn serialize(&self, value: &Vector) -> CodecResult<Record> {
        write_xyz("vector", value.x, value.y, value.z)
    }
}

impl Deserializer<Vector> for VectorCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<Vector> {
        let (x, y, z) = read_xyz(r)?;
        Ok(Vector::new(x, y, z))
    }

    fn is_valid(&self, r: &Record) -> bool {
        has_xyz(r)
    }
}

/// Blueprint for coordinates.
pub fn coordinate_blueprint() -> Blueprint<Coordinate> {
    Blueprint::from_codec(CoordinateCodec)
}

/// Blueprint for vectors.
pub fn vector_blueprint() -> Blueprint<Vector> {
    Blueprint::from_codec(VectorCodec)
}

/// Read the coordinate stored as an object under `field`.
pub fn read_coordinate(r: &Record, field: &str) -> CodecResult<Coordinate> {
    CoordinateCodec.deserialize(record::require_object(r, field)?)
}

/// Read the vector stored as an object under `field`.
pub fn read_vector(r: &Record, field: &str) -> CodecResult<Vector> {
    VectorCodec.deserialize(record::require_object(r, field)?)
}

/// Whether `field` holds a well-formed coordinate or vector object.
pub fn has_xyz_object(r: &Record, field: &str) -> bool {
    r.get(field).and_then(Value::as_object).is_some_and(has_xyz)
}
