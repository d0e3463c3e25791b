//! Wire messages for the `symbol_detector.SymbolDetector` service.
//!
//! The client and server stubs are generated by `build.rs` and included at
//! the bottom of this module.

use crate::candidate::BoundingBox as Match;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PredictRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub reference_image: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub query_image: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PredictResponse {
    #[prost(float, tag = "1")]
    pub similarity_score: f32,
    #[prost(bool, tag = "2")]
    pub is_match: bool,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScanRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub reference_image: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub blueprint_image: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScanResponse {
    #[prost(message, repeated, tag = "1")]
    pub matches: Vec<BoundingBox>,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct BoundingBox {
    #[prost(int32, tag = "1")]
    pub x: i32,
    #[prost(int32, tag = "2")]
    pub y: i32,
    #[prost(int32, tag = "3")]
    pub width: i32,
    #[prost(int32, tag = "4")]
    pub height: i32,
    #[prost(float, tag = "5")]
    pub score: f32,
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl From<Match> for BoundingBox {
    fn from(value: Match) -> Self {
        Self {
            x: to_i32(value.x),
            y: to_i32(value.y),
            width: to_i32(value.width),
            height: to_i32(value.height),
            score: value.score,
        }
    }
}

impl From<BoundingBox> for Match {
    fn from(value: BoundingBox) -> Self {
        Self {
            x: value.x.max(0) as u32,
            y: value.y.max(0) as u32,
            width: value.width.max(0) as u32,
            height: value.height.max(0) as u32,
            score: value.score,
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/symbol_detector.SymbolDetector.rs"));

#[cfg(test)]
mod tests {
    use super::BoundingBox;
    use crate::candidate::BoundingBox as Match;

    #[test]
    fn wire_boxes_convert_to_matches() {
        let wire = BoundingBox {
            x: 12,
            y: -3,
            width: 40,
            height: 20,
            score: 0.9,
        };
        let m = Match::from(wire);
        assert_eq!((m.x, m.y, m.width, m.height), (12, 0, 40, 20));
        assert_eq!(BoundingBox::from(m).x, 12);
    }
}
